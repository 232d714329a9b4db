//! JSON output formatting

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::tree::ScanSink;
use crate::types::{FolderRecord, FolderSize};
use crate::units::UnitFormat;

use super::config::ReportConfig;

/// One listed folder in a JSON report.
#[derive(Debug, Clone, Serialize)]
pub struct JsonFolder {
    pub path: PathBuf,
    pub name: String,
    pub is_link: bool,
    pub level: usize,
    /// Exact size, `null` when the folder could not be read
    pub bytes: FolderSize,
    /// Size rounded into the report unit, as shown in text output
    pub size: String,
}

/// Complete JSON report document.
#[derive(Debug, Clone, Serialize)]
pub struct JsonReport {
    pub root: PathBuf,
    pub unit: String,
    pub scanned_at: DateTime<Utc>,
    pub folders: Vec<JsonFolder>,
    /// Files directly in the root, `null` when the root could not be listed
    pub loose_bytes: FolderSize,
    pub total_bytes: FolderSize,
    pub free_bytes: Option<u64>,
}

/// Sink that collects a scan into a [`JsonReport`].
///
/// Folders are kept in path order, the same order text output lists them.
pub struct JsonReporter {
    root: PathBuf,
    format: UnitFormat,
    config: ReportConfig,
    scanned_at: DateTime<Utc>,
    folders: BTreeMap<PathBuf, FolderRecord>,
    loose_bytes: u64,
    total_bytes: u64,
    root_unreadable: bool,
}

impl JsonReporter {
    pub fn new(root: &Path, config: ReportConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            format: config.unit.format(),
            config,
            scanned_at: Utc::now(),
            folders: BTreeMap::new(),
            loose_bytes: 0,
            total_bytes: 0,
            root_unreadable: false,
        }
    }

    /// Build the final document.
    pub fn report(&self, free_bytes: Option<u64>) -> JsonReport {
        let folders = self
            .folders
            .values()
            .filter_map(|record| {
                let size = self.format.nice_size(record.size, self.config.hide_zero)?;
                Some(JsonFolder {
                    path: record.relative_path.clone(),
                    name: record.name.clone(),
                    is_link: record.is_link,
                    level: record.level,
                    bytes: record.size,
                    size: size.trim_start().to_string(),
                })
            })
            .collect();

        let (loose_bytes, total_bytes) = if self.root_unreadable {
            (FolderSize::Unreadable, FolderSize::Unreadable)
        } else {
            (FolderSize::Known(self.loose_bytes), FolderSize::Known(self.total_bytes))
        };

        JsonReport {
            root: self.root.clone(),
            unit: self.config.unit.name().to_string(),
            scanned_at: self.scanned_at,
            folders,
            loose_bytes,
            total_bytes,
            free_bytes,
        }
    }

    /// Write the document as pretty-printed JSON.
    pub fn finish<W: Write>(&self, out: &mut W, free_bytes: Option<u64>) -> io::Result<()> {
        let json = serde_json::to_string_pretty(&self.report(free_bytes)).map_err(io::Error::other)?;
        writeln!(out, "{}", json)
    }
}

impl ScanSink for JsonReporter {
    fn note_current_folder(&mut self, _name: &str, _is_link: bool) -> io::Result<()> {
        Ok(())
    }

    fn record_folder(&mut self, record: FolderRecord) -> io::Result<()> {
        if self.config.depth.lists(record.level) {
            self.folders.insert(record.relative_path.clone(), record);
        }
        Ok(())
    }

    fn record_file(&mut self, size: u64, level: usize) -> io::Result<()> {
        self.total_bytes += size;
        if level == 0 {
            self.loose_bytes += size;
        }
        Ok(())
    }

    fn record_unreadable_root(&mut self) -> io::Result<()> {
        self.root_unreadable = true;
        Ok(())
    }
}
