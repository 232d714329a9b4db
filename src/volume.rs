//! Free space on the volume containing a path

use std::path::Path;

use crate::error::{Error, Result};

/// Bytes available to the current user on the volume holding `path`.
#[cfg(unix)]
pub fn free_space(path: &Path) -> Result<u64> {
    let stat = nix::sys::statvfs::statvfs(path).map_err(|error| Error::FreeSpace {
        path: path.to_path_buf(),
        details: error.to_string(),
    })?;
    #[allow(clippy::unnecessary_cast)]
    let available = (stat.blocks_available() as u64).saturating_mul(stat.fragment_size() as u64);
    Ok(available)
}

/// Bytes available to the current user on the volume holding `path`.
#[cfg(windows)]
pub fn free_space(path: &Path) -> Result<u64> {
    use std::os::windows::ffi::OsStrExt;

    use windows::Win32::Storage::FileSystem::GetDiskFreeSpaceExW;
    use windows::core::PCWSTR;

    // Any directory on the volume works; the API wants a trailing separator.
    let mut wide: Vec<u16> = path.as_os_str().encode_wide().collect();
    if !matches!(wide.last(), Some(&ch) if ch == '\\' as u16 || ch == '/' as u16) {
        wide.push('\\' as u16);
    }
    wide.push(0);

    let mut available: u64 = 0;
    let mut total: u64 = 0;
    let mut total_free: u64 = 0;
    unsafe {
        GetDiskFreeSpaceExW(
            PCWSTR(wide.as_ptr()),
            Some(&mut available as *mut u64),
            Some(&mut total as *mut u64),
            Some(&mut total_free as *mut u64),
        )
    }
    .map_err(|error| Error::FreeSpace {
        path: path.to_path_buf(),
        details: error.to_string(),
    })?;
    Ok(available)
}

#[cfg(not(any(unix, windows)))]
pub fn free_space(_path: &Path) -> Result<u64> {
    Err(Error::FreeSpaceUnsupported)
}
