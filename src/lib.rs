//! dutally - per-folder disk usage with sorted, buffered output and a live spinner

pub mod error;
pub mod output;
pub mod tree;
pub mod types;
pub mod units;
pub mod volume;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::{Error, Result};
pub use output::{Depth, JsonReporter, ReportConfig, Reporter};
pub use tree::{DirSource, OsDirSource, ScanSink, SizeWalker, WalkerConfig};
pub use types::{FolderRecord, FolderSize};
pub use units::{Unit, UnitFormat};
pub use volume::free_space;
