//! Configuration types for the size walker

/// Configuration for which entries the walker counts.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Descend into symbolic links (reparse points on Windows).
    pub follow_links: bool,
    /// Count files the filesystem marks as offline.
    pub include_offline: bool,
    /// Skip dot-names on Unix and hidden-attribute entries on Windows.
    pub skip_hidden: bool,
    /// Entry names matching any of these globs are not counted
    pub ignore_patterns: Vec<String>,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            follow_links: true,
            include_offline: false,
            skip_hidden: false,
            ignore_patterns: Vec::new(),
        }
    }
}
