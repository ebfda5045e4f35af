use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::tree::Tree;
use crate::artifacts::snapshot::SnapshotEntry;
use std::io::Write;

impl Repository {
    /// Record a snapshot of the backup directory
    ///
    /// Scans the workspace, stores every file as a blob, builds and stores
    /// the tree hierarchy, then commits with the current HEAD as parent.
    /// If the root tree matches HEAD's tree nothing changed and no commit
    /// is created.
    pub fn snapshot(&mut self, message: Option<&str>) -> anyhow::Result<()> {
        let entries = self.scan_workspace()?;

        let tree = Tree::build(entries.iter())?;
        let tree_id = tree.object_id()?;

        let parent = self.refs().read_head()?;
        let is_root = match parent {
            Some(_) => "",
            None => "(root-snapshot) ",
        };

        if let Some(parent_oid) = &parent {
            let parent_commit = self
                .database()
                .parse_object_as_commit(parent_oid)?
                .ok_or_else(|| anyhow::anyhow!("HEAD {} is not a snapshot", parent_oid))?;

            if parent_commit.tree_oid() == &tree_id {
                write!(
                    self.writer(),
                    "No changes since snapshot [{}]",
                    parent_oid.to_short_oid()
                )?;
                return Ok(());
            }
        }

        let store_tree = &|tree: &Tree| self.database().store(tree.clone());
        tree.traverse(store_tree)?;

        let author = Author::from_env();
        let message = message
            .map(|message| message.trim().to_string())
            .unwrap_or_else(|| format!("Snapshot of {} file(s)", entries.len()));

        let commit = Commit::new(parent.into_iter().collect(), tree_id, author, message);
        let commit_id = commit.object_id()?;
        self.database().store(commit.clone())?;
        self.refs().update_head(commit_id.clone())?;

        write!(
            self.writer(),
            "[{}{}] {}",
            is_root,
            commit_id.to_short_oid(),
            commit.short_message()
        )?;

        Ok(())
    }

    /// Store every workspace file as a blob and collect the tree entries
    fn scan_workspace(&self) -> anyhow::Result<Vec<SnapshotEntry>> {
        self.workspace()
            .list_files()?
            .into_iter()
            .map(|path| {
                let blob = self.workspace().parse_blob(&path)?;
                let oid = blob.object_id()?;
                let mode = blob.mode().clone();
                self.database().store(blob)?;

                Ok(SnapshotEntry { path, oid, mode })
            })
            .collect()
    }
}
