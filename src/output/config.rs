//! Output configuration types

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::units::Unit;

const DEFAULT_DEPTH: usize = 1;

/// How many folder levels a report lists individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    Limited(usize),
    Unbounded,
}

impl Depth {
    /// Whether folders reported at `level` are listed.
    pub fn lists(self, level: usize) -> bool {
        match self {
            Depth::Limited(max) => level < max,
            Depth::Unbounded => true,
        }
    }
}

impl Default for Depth {
    fn default() -> Self {
        Depth::Limited(DEFAULT_DEPTH)
    }
}

impl FromStr for Depth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("max") || s.eq_ignore_ascii_case("unbounded") {
            return Ok(Depth::Unbounded);
        }
        s.parse()
            .map(Depth::Limited)
            .map_err(|_| Error::InvalidDepth(s.to_string()))
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Depth::Limited(n) => write!(f, "{}", n),
            Depth::Unbounded => f.write_str("max"),
        }
    }
}

/// Configuration for report formatting.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub unit: Unit,
    pub depth: Depth,
    /// Draw the live spinner; only sensible on an interactive terminal
    pub show_progress: bool,
    /// Leave out folders whose size rounds to zero in `unit`
    pub hide_zero: bool,
    pub use_color: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            unit: Unit::default(),
            depth: Depth::default(),
            show_progress: false,
            hide_zero: false,
            use_color: false,
        }
    }
}
