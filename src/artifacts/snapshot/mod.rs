//! Snapshot building blocks
//!
//! - `SnapshotEntry`: one workspace file headed into a snapshot (path, blob
//!   oid, mode), the unit the tree builder consumes.
//! - `walker`: flattens a recorded snapshot back into a path → entry map.

pub mod walker;

use crate::artifacts::objects::entry_mode::FileMode;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use std::path::{Path, PathBuf};

/// A single file captured by a workspace scan
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotEntry {
    /// Path relative to the backup directory root
    pub path: PathBuf,
    /// Oid of the stored blob
    pub oid: ObjectId,
    /// File mode (regular or executable)
    pub mode: FileMode,
}

impl SnapshotEntry {
    /// Intermediate directories from the root down to the file's parent
    ///
    /// For `a/b/3.txt` this is `[a, a/b]`.
    pub fn parent_dirs(&self) -> Vec<&Path> {
        let mut dirs: Vec<&Path> = self
            .path
            .ancestors()
            .skip(1)
            .filter(|p| !p.as_os_str().is_empty())
            .collect();
        dirs.reverse();
        dirs
    }

    pub fn basename(&self) -> anyhow::Result<&str> {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .with_context(|| format!("Invalid entry path {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_dirs_are_listed_root_first() {
        let entry = SnapshotEntry {
            path: PathBuf::from("a/b/3.txt"),
            oid: ObjectId::try_parse("3".repeat(40)).unwrap(),
            mode: FileMode::Regular,
        };

        assert_eq!(
            entry.parent_dirs(),
            vec![Path::new("a"), Path::new("a/b")]
        );
        assert_eq!(entry.basename().unwrap(), "3.txt");
    }

    #[test]
    fn top_level_entry_has_no_parents() {
        let entry = SnapshotEntry {
            path: PathBuf::from("1.txt"),
            oid: ObjectId::try_parse("1".repeat(40)).unwrap(),
            mode: FileMode::Regular,
        };

        assert!(entry.parent_dirs().is_empty());
    }
}
