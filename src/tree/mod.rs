//! Directory size walking
//!
//! `SizeWalker` performs a single-threaded, depth-first traversal over a
//! `DirSource`, summing file sizes bottom-up and streaming the results into a
//! `ScanSink`. Which entries count is decided by an `EntryFilter` built from
//! the `WalkerConfig`.

mod config;
mod filter;
mod source;
mod utils;
mod walker;

// Re-export public types
pub use config::WalkerConfig;
pub use filter::EntryFilter;
pub use source::{DirEntry, DirSource, EntryKind, OsDirSource};
pub use utils::{glob_match, is_hidden_name};
pub use walker::{ScanSink, SizeWalker};
