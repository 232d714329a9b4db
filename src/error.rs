//! Error types for configuration and volume queries

use std::path::PathBuf;

use thiserror::Error;

/// Shared `Result` alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown unit '{0}' (expected one of: b, kb, mb, gb, tb, kib, mib, gib, tib)")]
    InvalidUnit(String),

    #[error("invalid depth '{0}': expected a non-negative integer or 'max'")]
    InvalidDepth(String),

    #[error("invalid ignore pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("cannot access '{path}': {source}")]
    RootUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{0}' is not a directory")]
    NotADirectory(PathBuf),

    #[error("free space query is not supported on this platform")]
    FreeSpaceUnsupported,

    #[error("free space query failed for '{path}': {details}")]
    FreeSpace { path: PathBuf, details: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
