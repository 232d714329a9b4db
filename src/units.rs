//! Display units and fixed-width size formatting
//!
//! Every size in a report is rendered through a [`UnitFormat`], resolved once
//! from the static unit table. Values are rounded half-up into the unit,
//! grouped with thousands separators and right-aligned to the unit's field
//! width so that the name column lines up.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::types::FolderSize;

const KB: u64 = 1000;
const KIB: u64 = 1024;

/// Unit a report is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Unit {
    Bytes,
    Kilobytes,
    Megabytes,
    Gigabytes,
    Terabytes,
    Kibibytes,
    #[default]
    Mebibytes,
    Gibibytes,
    Tebibytes,
}

impl Unit {
    pub const ALL: [Unit; 9] = [
        Unit::Bytes,
        Unit::Kilobytes,
        Unit::Megabytes,
        Unit::Gigabytes,
        Unit::Terabytes,
        Unit::Kibibytes,
        Unit::Mebibytes,
        Unit::Gibibytes,
        Unit::Tebibytes,
    ];

    /// Name accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Unit::Bytes => "b",
            Unit::Kilobytes => "kb",
            Unit::Megabytes => "mb",
            Unit::Gigabytes => "gb",
            Unit::Terabytes => "tb",
            Unit::Kibibytes => "kib",
            Unit::Mebibytes => "mib",
            Unit::Gibibytes => "gib",
            Unit::Tebibytes => "tib",
        }
    }

    pub fn format(self) -> UnitFormat {
        let (divisor, suffix, width) = match self {
            Unit::Bytes => (1, "", 15),
            Unit::Kilobytes => (KB, " KB", 14),
            Unit::Megabytes => (KB.pow(2), " MB", 10),
            Unit::Gigabytes => (KB.pow(3), " GB", 8),
            Unit::Terabytes => (KB.pow(4), " TB", 8),
            Unit::Kibibytes => (KIB, " KiB", 15),
            Unit::Mebibytes => (KIB.pow(2), " MiB", 11),
            Unit::Gibibytes => (KIB.pow(3), " GiB", 9),
            Unit::Tebibytes => (KIB.pow(4), " TiB", 9),
        };
        UnitFormat {
            divisor,
            suffix,
            width,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Unit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        if wanted == "bytes" {
            return Ok(Unit::Bytes);
        }
        Unit::ALL
            .into_iter()
            .find(|unit| unit.name() == wanted)
            .ok_or_else(|| Error::InvalidUnit(s.to_string()))
    }
}

/// Divisor, suffix and column width for one [`Unit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitFormat {
    pub divisor: u64,
    pub suffix: &'static str,
    pub width: usize,
}

impl UnitFormat {
    /// Round a byte count half-up into this unit.
    pub fn round(&self, bytes: u64) -> u64 {
        bytes.saturating_add(self.divisor / 2) / self.divisor
    }

    /// Render a size padded to the field width.
    ///
    /// Returns `None` when the value rounds to zero and `suppress_zero` is
    /// set: the line for it should not be printed at all.
    pub fn nice_size(&self, size: FolderSize, suppress_zero: bool) -> Option<String> {
        let text = match size {
            FolderSize::Unreadable => "?".to_string(),
            FolderSize::Known(bytes) => {
                let rounded = self.round(bytes);
                if rounded == 0 && suppress_zero {
                    return None;
                }
                format!("{}{}", group_thousands(rounded), self.suffix)
            }
        };
        Some(format!("{:>width$}", text, width = self.width))
    }

    /// Render a byte count that is never suppressed (totals, free space).
    pub fn bytes(&self, bytes: u64) -> String {
        let text = format!("{}{}", group_thousands(self.round(bytes)), self.suffix);
        format!("{:>width$}", text, width = self.width)
    }
}

/// Insert a `,` every three digits from the right.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
