//! SizeWalker - depth-first size aggregation that streams into a sink

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::types::{FolderRecord, FolderSize};

use super::config::WalkerConfig;
use super::filter::EntryFilter;
use super::source::{DirEntry, DirSource, EntryKind, OsDirSource};

/// Receiver of walk events.
///
/// Events arrive strictly depth-first: every file of a folder's subtree and
/// every nested folder are reported before the folder itself. Errors are
/// output errors only; filesystem failures travel as [`FolderSize`] data.
pub trait ScanSink {
    /// A level-0 folder is about to be scanned.
    fn note_current_folder(&mut self, name: &str, is_link: bool) -> io::Result<()>;

    /// A folder has finished. Level-0 records close a top-level branch.
    fn record_folder(&mut self, record: FolderRecord) -> io::Result<()>;

    /// A counted file of `size` bytes was seen in a listing at `level`.
    fn record_file(&mut self, size: u64, level: usize) -> io::Result<()>;

    /// The root itself could not be listed; no other event will follow.
    fn record_unreadable_root(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Depth-first, single-threaded walker that sums sizes bottom-up.
pub struct SizeWalker<S = OsDirSource> {
    config: WalkerConfig,
    filter: EntryFilter,
    source: S,
}

impl SizeWalker<OsDirSource> {
    pub fn new(config: WalkerConfig) -> Result<Self> {
        Self::with_source(config, OsDirSource)
    }
}

impl<S: DirSource> SizeWalker<S> {
    pub fn with_source(config: WalkerConfig, source: S) -> Result<Self> {
        let filter = EntryFilter::new(&config)?;
        Ok(Self {
            config,
            filter,
            source,
        })
    }

    /// Walk `root`, streaming events into `sink`. Returns the root's size.
    pub fn walk<K: ScanSink>(&self, root: &Path, sink: &mut K) -> io::Result<FolderSize> {
        let mut ancestors = Vec::new();
        let size = self.walk_dir(root, Path::new(""), 0, &mut ancestors, sink)?;
        if size.is_unreadable() {
            sink.record_unreadable_root()?;
        }
        Ok(size)
    }

    fn walk_dir<K: ScanSink>(
        &self,
        path: &Path,
        relative: &Path,
        level: usize,
        ancestors: &mut Vec<PathBuf>,
        sink: &mut K,
    ) -> io::Result<FolderSize> {
        let entries = match self.source.read_dir(path) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(dir = %path.display(), error = %e, "cannot enumerate directory");
                return Ok(FolderSize::Unreadable);
            }
        };

        let guard_cycles = self.config.follow_links;
        if guard_cycles {
            ancestors.push(self.source.resolve(path).unwrap_or_else(|_| path.to_path_buf()));
        }

        let mut total = 0u64;
        for entry in entries {
            if !self.filter.admits(&entry) {
                continue;
            }

            let entry_path = path.join(&entry.name);
            if entry.is_dir() {
                if entry.is_link && self.closes_cycle(&entry_path, ancestors) {
                    debug!(path = %entry_path.display(), "skipping link back into its own ancestry");
                    continue;
                }
                total += self
                    .visit_dir(&entry, &entry_path, relative, level, ancestors, sink)?
                    .contribution();
            } else if entry.kind == EntryKind::File {
                sink.record_file(entry.size, level)?;
                total += entry.size;
            }
        }

        if guard_cycles {
            ancestors.pop();
        }
        Ok(FolderSize::Known(total))
    }

    fn visit_dir<K: ScanSink>(
        &self,
        entry: &DirEntry,
        entry_path: &Path,
        relative: &Path,
        level: usize,
        ancestors: &mut Vec<PathBuf>,
        sink: &mut K,
    ) -> io::Result<FolderSize> {
        let name = entry.display_name();
        if level == 0 {
            sink.note_current_folder(&name, entry.is_link)?;
        }

        let child_relative = relative.join(&entry.name);
        let size = self.walk_dir(entry_path, &child_relative, level + 1, ancestors, sink)?;

        sink.record_folder(FolderRecord {
            relative_path: child_relative,
            name,
            is_link: entry.is_link,
            size,
            level,
        })?;
        Ok(size)
    }

    fn closes_cycle(&self, path: &Path, ancestors: &[PathBuf]) -> bool {
        match self.source.resolve(path) {
            Ok(target) => ancestors.contains(&target),
            Err(_) => false,
        }
    }
}
