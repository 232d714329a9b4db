//! Shared utility functions for tree walking

use std::ffi::OsStr;

use glob::Pattern;

/// Dot-names are hidden; the `.` and `..` pseudo-entries are not names at all.
pub fn is_hidden_name(name: &OsStr) -> bool {
    let bytes = name.as_encoded_bytes();
    bytes.first() == Some(&b'.') && !is_pseudo_entry(name)
}

/// The self and parent entries some listings include.
pub fn is_pseudo_entry(name: &OsStr) -> bool {
    name == "." || name == ".."
}

/// Match a glob pattern against a name.
pub fn glob_match(pattern: &Pattern, name: &OsStr) -> bool {
    pattern.matches(&name.to_string_lossy())
}
