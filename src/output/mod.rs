//! Report formatting and display
//!
//! This module provides the sinks a scan can stream into:
//! - `Reporter`: text report with per-branch buffering and a live spinner
//! - `JsonReporter`: a single JSON document written at the end
//!
//! # Module Structure
//!
//! - `config` - Report configuration types
//! - `progress` - Spinner state machine
//! - `streaming` - Text reporter
//! - `json` - JSON reporter

mod config;
mod json;
mod progress;
mod streaming;

// Re-export public types
pub use config::{Depth, ReportConfig};
pub use json::{JsonFolder, JsonReport, JsonReporter};
pub use progress::{Phase, Progress, REDRAW_INTERVAL, SLOW_SCAN};
pub use streaming::{Reporter, RunningTotals};
