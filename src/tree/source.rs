//! Directory enumeration
//!
//! The walker never touches `std::fs` directly. It asks a [`DirSource`] for
//! the entries of one directory at a time, so enumeration failures can be
//! injected in tests and platform attribute handling stays in one place.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::utils::is_hidden_name;

/// What an entry is, after following links when it is one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Dir,
    File,
    /// Broken links and anything else that is neither file nor directory.
    Other,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: OsString,
    pub kind: EntryKind,
    pub is_link: bool,
    pub is_device: bool,
    pub is_offline: bool,
    pub is_hidden: bool,
    /// Length in bytes; zero for directories.
    pub size: u64,
}

impl DirEntry {
    pub fn file(name: impl Into<OsString>, size: u64) -> Self {
        let name = name.into();
        Self {
            is_hidden: is_hidden_name(&name),
            name,
            kind: EntryKind::File,
            is_link: false,
            is_device: false,
            is_offline: false,
            size,
        }
    }

    pub fn dir(name: impl Into<OsString>) -> Self {
        Self {
            kind: EntryKind::Dir,
            ..Self::file(name, 0)
        }
    }

    pub fn linked(mut self) -> Self {
        self.is_link = true;
        self
    }

    pub fn device(mut self) -> Self {
        self.is_device = true;
        self
    }

    pub fn offline(mut self) -> Self {
        self.is_offline = true;
        self
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }

    /// Name for display, lossily converted to UTF-8.
    pub fn display_name(&self) -> String {
        self.name.to_string_lossy().to_string()
    }
}

/// Capability that lists one directory at a time.
pub trait DirSource {
    /// Entries of `path` in the order the filesystem returns them.
    ///
    /// An `Err` means the directory itself could not be enumerated, which is
    /// distinct from an empty directory.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;

    /// Canonical location of a directory, used to detect link cycles.
    fn resolve(&self, path: &Path) -> io::Result<PathBuf> {
        Ok(path.to_path_buf())
    }
}

/// [`DirSource`] backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsDirSource;

impl DirSource for OsDirSource {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            match entry.and_then(|e| os_entry(&e)) {
                Ok(entry) => entries.push(entry),
                Err(e) => debug!(dir = %path.display(), error = %e, "dropping unreadable entry"),
            }
        }
        Ok(entries)
    }

    fn resolve(&self, path: &Path) -> io::Result<PathBuf> {
        fs::canonicalize(path)
    }
}

fn os_entry(entry: &fs::DirEntry) -> io::Result<DirEntry> {
    let name = entry.file_name();
    let own = entry.metadata()?;
    let is_link = own.file_type().is_symlink() || is_reparse_point(&own);

    // Links are described by their target; a dangling one becomes `Other`.
    let target = if is_link {
        fs::metadata(entry.path()).ok()
    } else {
        Some(own.clone())
    };

    let (kind, size) = match &target {
        Some(meta) if meta.is_dir() => (EntryKind::Dir, 0),
        Some(meta) if meta.is_file() => (EntryKind::File, meta.len()),
        _ => (EntryKind::Other, 0),
    };

    Ok(DirEntry {
        is_hidden: is_hidden_name(&name) || has_hidden_attribute(&own),
        name,
        kind,
        is_link,
        is_device: target.as_ref().is_some_and(is_device) || is_device(&own),
        is_offline: is_offline(&own),
        size,
    })
}

#[cfg(unix)]
fn is_device(meta: &fs::Metadata) -> bool {
    use std::os::unix::fs::FileTypeExt;

    let ft = meta.file_type();
    ft.is_block_device() || ft.is_char_device() || ft.is_fifo() || ft.is_socket()
}

#[cfg(windows)]
mod attributes {
    pub const HIDDEN: u32 = 0x0000_0002;
    pub const DEVICE: u32 = 0x0000_0040;
    pub const REPARSE_POINT: u32 = 0x0000_0400;
    pub const OFFLINE: u32 = 0x0000_1000;

    pub fn has(meta: &std::fs::Metadata, flag: u32) -> bool {
        use std::os::windows::fs::MetadataExt;

        meta.file_attributes() & flag != 0
    }
}

#[cfg(windows)]
fn is_device(meta: &fs::Metadata) -> bool {
    attributes::has(meta, attributes::DEVICE)
}

#[cfg(not(any(unix, windows)))]
fn is_device(_meta: &fs::Metadata) -> bool {
    false
}

#[cfg(windows)]
fn is_offline(meta: &fs::Metadata) -> bool {
    attributes::has(meta, attributes::OFFLINE)
}

#[cfg(not(windows))]
fn is_offline(_meta: &fs::Metadata) -> bool {
    false
}

#[cfg(windows)]
fn is_reparse_point(meta: &fs::Metadata) -> bool {
    attributes::has(meta, attributes::REPARSE_POINT)
}

#[cfg(not(windows))]
fn is_reparse_point(_meta: &fs::Metadata) -> bool {
    false
}

#[cfg(windows)]
fn has_hidden_attribute(meta: &fs::Metadata) -> bool {
    attributes::has(meta, attributes::HIDDEN)
}

#[cfg(not(windows))]
fn has_hidden_attribute(_meta: &fs::Metadata) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn find<'a>(entries: &'a [DirEntry], name: &str) -> &'a DirEntry {
        entries
            .iter()
            .find(|e| e.name == name)
            .unwrap_or_else(|| panic!("missing entry {name}"))
    }

    #[test]
    fn test_os_source_lists_files_and_dirs() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.bin"), vec![0u8; 300]).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join(".dot"), b"x").unwrap();

        let entries = OsDirSource.read_dir(dir.path()).unwrap();
        assert_eq!(entries.len(), 3);

        let file = find(&entries, "a.bin");
        assert_eq!(file.kind, EntryKind::File);
        assert_eq!(file.size, 300);
        assert!(!file.is_link);

        let sub = find(&entries, "sub");
        assert!(sub.is_dir());
        assert_eq!(sub.size, 0);

        assert!(find(&entries, ".dot").is_hidden);
    }

    #[test]
    fn test_os_source_missing_dir_is_error() {
        let dir = TempDir::new().unwrap();
        assert!(OsDirSource.read_dir(&dir.path().join("gone")).is_err());
    }

    #[test]
    #[cfg(unix)]
    fn test_os_source_describes_links_by_target() {
        use std::os::unix::fs::symlink;

        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("real")).unwrap();
        fs::write(dir.path().join("data"), vec![1u8; 64]).unwrap();
        symlink(dir.path().join("real"), dir.path().join("to_dir")).unwrap();
        symlink(dir.path().join("data"), dir.path().join("to_file")).unwrap();
        symlink(dir.path().join("nowhere"), dir.path().join("dangling")).unwrap();

        let entries = OsDirSource.read_dir(dir.path()).unwrap();

        let to_dir = find(&entries, "to_dir");
        assert!(to_dir.is_link && to_dir.is_dir());

        let to_file = find(&entries, "to_file");
        assert!(to_file.is_link);
        assert_eq!(to_file.size, 64);

        assert_eq!(find(&entries, "dangling").kind, EntryKind::Other);
    }

    #[test]
    #[cfg(unix)]
    fn test_os_source_flags_fifo_as_device() {
        let dir = TempDir::new().unwrap();
        let fifo = dir.path().join("pipe");
        nix::unistd::mkfifo(&fifo, nix::sys::stat::Mode::S_IRWXU).unwrap();

        let entries = OsDirSource.read_dir(dir.path()).unwrap();
        assert!(find(&entries, "pipe").is_device);
    }
}
