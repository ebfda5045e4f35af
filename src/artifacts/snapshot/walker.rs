//! Revision tree walker
//!
//! Flattens a recorded snapshot into a sorted `path → (oid, mode)` map by
//! walking its tree hierarchy recursively. The map keys are paths relative
//! to the backup directory root; blob content for any entry can be loaded
//! from the database by oid.

use crate::areas::database::Database;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::objects::object::ObjectBox;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub type FileMap = BTreeMap<PathBuf, DatabaseEntry>;

#[derive(Debug)]
pub struct TreeWalker<'d> {
    database: &'d Database,
}

impl<'d> TreeWalker<'d> {
    pub fn new(database: &'d Database) -> Self {
        TreeWalker { database }
    }

    /// Enumerate every regular file reachable from a commit or tree oid
    pub fn walk(&self, oid: &ObjectId) -> anyhow::Result<FileMap> {
        let mut files = BTreeMap::new();
        let tree = self.inflate_oid_to_tree(oid)?;
        self.walk_tree(&tree, Path::new(""), &mut files)?;

        Ok(files)
    }

    fn walk_tree(&self, tree: &Tree, prefix: &Path, files: &mut FileMap) -> anyhow::Result<()> {
        for (name, entry) in tree.entries() {
            let path = prefix.join(name);

            if entry.is_tree() {
                let subtree = self.inflate_oid_to_tree(&entry.oid)?;
                self.walk_tree(&subtree, &path, files)?;
            } else {
                files.insert(path, entry.clone());
            }
        }

        Ok(())
    }

    fn inflate_oid_to_tree(&self, oid: &ObjectId) -> anyhow::Result<Tree> {
        let object = self.database.parse_object(oid)?;

        match object {
            ObjectBox::Tree(tree) => Ok(*tree),
            ObjectBox::Commit(commit) => self.inflate_oid_to_tree(commit.tree_oid()),
            _ => Err(anyhow::anyhow!("Invalid tree object {}", oid)),
        }
    }
}
