//! Test utilities: temporary directory trees, an in-memory directory source
//! with failure injection, and a sink that records walk events.
//!
//! This module is only compiled for tests and benchmarks.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::tree::{DirEntry, DirSource, ScanSink};
use crate::types::FolderRecord;

/// A temporary directory tree for testing.
///
/// The directory is automatically cleaned up when dropped.
pub struct TestTree {
    dir: TempDir,
}

impl TestTree {
    /// Create a new empty temporary directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir }
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Add a file of exactly `size` bytes, creating parent directories.
    pub fn add_file(&self, path: &str, size: usize) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, vec![b'x'; size]).expect("Failed to write file");
        full_path
    }

    /// Add an empty directory.
    pub fn add_dir(&self, path: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        fs::create_dir_all(&full_path).expect("Failed to create dir");
        full_path
    }
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory [`DirSource`].
///
/// Listings keep insertion order. Directories marked with [`failing`]
/// report an enumeration error.
///
/// [`failing`]: MemoryDirSource::failing
#[derive(Debug, Clone, Default)]
pub struct MemoryDirSource {
    listings: HashMap<PathBuf, Vec<DirEntry>>,
    failing: HashSet<PathBuf>,
    links: HashMap<PathBuf, PathBuf>,
}

impl MemoryDirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let mut source = Self::default();
        source.listings.insert(root.into(), Vec::new());
        source
    }

    /// Add a file, creating every missing ancestor directory.
    pub fn with_file(mut self, path: impl AsRef<Path>, size: u64) -> Self {
        let path = path.as_ref();
        let (parent, name) = split(path);
        self.ensure_dir(parent);
        self.push_unique(parent, DirEntry::file(name, size));
        self
    }

    /// Add an empty directory, creating every missing ancestor.
    pub fn with_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.ensure_dir(path.as_ref());
        self
    }

    /// Append a hand-built entry to the listing of `dir`.
    pub fn with_dir_entry(mut self, dir: impl AsRef<Path>, entry: DirEntry) -> Self {
        let dir = dir.as_ref();
        self.ensure_dir(dir);
        if entry.is_dir() && entry.name != "." && entry.name != ".." {
            self.listings.entry(dir.join(&entry.name)).or_default();
        }
        self.push_unique(dir, entry);
        self
    }

    /// Make enumeration of `dir` fail.
    pub fn failing(mut self, dir: impl Into<PathBuf>) -> Self {
        self.failing.insert(dir.into());
        self
    }

    /// Make `path` resolve to `target` for link-cycle detection.
    pub fn resolving(mut self, path: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        self.links.insert(path.into(), target.into());
        self
    }

    fn ensure_dir(&mut self, dir: &Path) {
        if self.listings.contains_key(dir) {
            return;
        }
        self.listings.insert(dir.to_path_buf(), Vec::new());
        if let (Some(parent), Some(name)) = (dir.parent(), dir.file_name()) {
            self.ensure_dir(parent);
            self.push_unique(parent, DirEntry::dir(name));
        }
    }

    fn push_unique(&mut self, dir: &Path, entry: DirEntry) {
        let listing = self.listings.entry(dir.to_path_buf()).or_default();
        if !listing.iter().any(|e| e.name == entry.name) {
            listing.push(entry);
        }
    }
}

fn split(path: &Path) -> (&Path, &std::ffi::OsStr) {
    let parent = path.parent().expect("path has a parent");
    let name = path.file_name().expect("path has a file name");
    (parent, name)
}

impl DirSource for MemoryDirSource {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        if self.failing.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "injected enumeration failure",
            ));
        }
        self.listings
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such directory"))
    }

    fn resolve(&self, path: &Path) -> io::Result<PathBuf> {
        Ok(self.links.get(path).cloned().unwrap_or_else(|| path.to_path_buf()))
    }
}

/// One event received by a [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    CurrentFolder { name: String, is_link: bool },
    Folder(FolderRecord),
    File { size: u64, level: usize },
    UnreadableRoot,
}

/// [`ScanSink`] that keeps every event in arrival order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<SinkEvent>,
}

impl RecordingSink {
    pub fn folders(&self) -> impl Iterator<Item = &FolderRecord> {
        self.events.iter().filter_map(|e| match e {
            SinkEvent::Folder(record) => Some(record),
            _ => None,
        })
    }

    pub fn files(&self) -> impl Iterator<Item = (u64, usize)> + '_ {
        self.events.iter().filter_map(|e| match e {
            SinkEvent::File { size, level } => Some((*size, *level)),
            _ => None,
        })
    }
}

impl ScanSink for RecordingSink {
    fn note_current_folder(&mut self, name: &str, is_link: bool) -> io::Result<()> {
        self.events.push(SinkEvent::CurrentFolder {
            name: name.to_string(),
            is_link,
        });
        Ok(())
    }

    fn record_folder(&mut self, record: FolderRecord) -> io::Result<()> {
        self.events.push(SinkEvent::Folder(record));
        Ok(())
    }

    fn record_file(&mut self, size: u64, level: usize) -> io::Result<()> {
        self.events.push(SinkEvent::File { size, level });
        Ok(())
    }

    fn record_unreadable_root(&mut self) -> io::Result<()> {
        self.events.push(SinkEvent::UnreadableRoot);
        Ok(())
    }
}
