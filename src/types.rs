//! Size and folder record types shared by the walker and the reporters

use std::path::PathBuf;

use serde::Serialize;

/// Size of a directory subtree.
///
/// `Unreadable` marks a directory whose listing could not be enumerated.
/// It renders as `?` and contributes nothing to the size of its ancestors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderSize {
    Known(u64),
    Unreadable,
}

impl FolderSize {
    /// Bytes this subtree adds to its parent's total.
    pub fn contribution(self) -> u64 {
        match self {
            FolderSize::Known(bytes) => bytes,
            FolderSize::Unreadable => 0,
        }
    }

    pub fn bytes(self) -> Option<u64> {
        match self {
            FolderSize::Known(bytes) => Some(bytes),
            FolderSize::Unreadable => None,
        }
    }

    pub fn is_unreadable(self) -> bool {
        matches!(self, FolderSize::Unreadable)
    }
}

impl Serialize for FolderSize {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.bytes().serialize(serializer)
    }
}

/// A finished directory, as reported by the walker.
///
/// `level` is the depth of the directory's *parent* listing: children of
/// the scan root are level 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderRecord {
    pub relative_path: PathBuf,
    pub name: String,
    pub is_link: bool,
    pub size: FolderSize,
    pub level: usize,
}

impl FolderRecord {
    /// Name as printed in the report, in brackets for links.
    pub fn display_name(&self) -> String {
        if self.is_link {
            format!("[{}]", self.name)
        } else {
            self.name.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreadable_contributes_nothing() {
        assert_eq!(FolderSize::Unreadable.contribution(), 0);
        assert_eq!(FolderSize::Known(42).contribution(), 42);
        assert!(FolderSize::Unreadable.is_unreadable());
    }

    #[test]
    fn test_link_display_name_bracketed() {
        let record = FolderRecord {
            relative_path: PathBuf::from("cache"),
            name: "cache".to_string(),
            is_link: true,
            size: FolderSize::Known(0),
            level: 0,
        };
        assert_eq!(record.display_name(), "[cache]");
    }

    #[test]
    fn test_folder_size_serializes_as_nullable_bytes() {
        assert_eq!(serde_json::to_string(&FolderSize::Known(7)).unwrap(), "7");
        assert_eq!(serde_json::to_string(&FolderSize::Unreadable).unwrap(), "null");
    }
}
