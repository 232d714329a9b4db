//! Entry inclusion policy for the size walker

use glob::Pattern;

use crate::error::{Error, Result};

use super::config::WalkerConfig;
use super::source::DirEntry;
use super::utils::{glob_match, is_pseudo_entry};

/// Decides which directory entries are counted.
#[derive(Debug, Clone)]
pub struct EntryFilter {
    follow_links: bool,
    include_offline: bool,
    skip_hidden: bool,
    ignore: Vec<Pattern>,
}

impl EntryFilter {
    /// Build a filter, compiling the ignore patterns up front.
    pub fn new(config: &WalkerConfig) -> Result<Self> {
        let ignore = config
            .ignore_patterns
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|source| Error::InvalidPattern {
                    pattern: p.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            follow_links: config.follow_links,
            include_offline: config.include_offline,
            skip_hidden: config.skip_hidden,
            ignore,
        })
    }

    /// Whether an entry contributes to the totals.
    pub fn admits(&self, entry: &DirEntry) -> bool {
        if is_pseudo_entry(&entry.name) || entry.is_device {
            return false;
        }
        if entry.is_offline && !self.include_offline {
            return false;
        }
        if entry.is_link && !self.follow_links {
            return false;
        }
        if entry.is_hidden && self.skip_hidden {
            return false;
        }
        !self.ignore.iter().any(|p| glob_match(p, &entry.name))
    }
}
