use crate::areas::database::Database;
use crate::artifacts::diff::tree_diff::{ChangeSet, TreeChangeType};
use crate::artifacts::mirror::store::MirrorStore;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// One remote operation derived from a changeset entry
#[derive(Debug, Clone, PartialEq)]
pub enum MirrorAction {
    Upload { path: PathBuf, oid: ObjectId },
    Replace { path: PathBuf, oid: ObjectId },
    Delete { path: PathBuf },
}

impl MirrorAction {
    pub fn path(&self) -> &Path {
        match self {
            MirrorAction::Upload { path, .. }
            | MirrorAction::Replace { path, .. }
            | MirrorAction::Delete { path } => path,
        }
    }

    /// One line of dry-run output, colored like the diff listing
    pub fn display(&self) -> String {
        match self {
            MirrorAction::Upload { path, .. } => {
                format!("{}\t{}", "upload".green(), path.display())
            }
            MirrorAction::Replace { path, .. } => {
                format!("{}\t{}", "replace".yellow(), path.display())
            }
            MirrorAction::Delete { path } => format!("{}\t{}", "delete".red(), path.display()),
        }
    }
}

/// Counters for one applied plan
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MirrorReport {
    pub uploaded: usize,
    pub replaced: usize,
    pub deleted: usize,
}

impl MirrorReport {
    pub fn total(&self) -> usize {
        self.uploaded + self.replaced + self.deleted
    }

    pub fn summary(&self) -> String {
        format!(
            "{} uploaded, {} replaced, {} deleted",
            self.uploaded, self.replaced, self.deleted
        )
    }
}

/// The ordered list of remote operations for one sync run
#[derive(Debug, Default)]
pub struct MirrorPlan {
    actions: Vec<MirrorAction>,
}

impl MirrorPlan {
    /// Derive the action list from a changeset, keeping path order
    pub fn from_changes(changes: &ChangeSet) -> Self {
        let actions = changes
            .iter()
            .filter_map(|(path, change)| match change {
                TreeChangeType::Added(entry) => Some(MirrorAction::Upload {
                    path: path.clone(),
                    oid: entry.oid.clone(),
                }),
                TreeChangeType::Modified { new, .. } => Some(MirrorAction::Replace {
                    path: path.clone(),
                    oid: new.oid.clone(),
                }),
                TreeChangeType::Deleted(_) => Some(MirrorAction::Delete { path: path.clone() }),
            })
            .collect();

        MirrorPlan { actions }
    }

    pub fn actions(&self) -> &[MirrorAction] {
        &self.actions
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Replay every action against the store
    ///
    /// Blob bytes come from the object database, never from the working
    /// tree: the mirror reflects the snapshot being synced, not files as
    /// they happen to look right now.
    // TODO: stream large blobs instead of buffering each one whole
    pub async fn apply<S: MirrorStore>(
        &self,
        database: &Database,
        store: &S,
    ) -> anyhow::Result<MirrorReport> {
        let mut report = MirrorReport::default();

        for action in &self.actions {
            match action {
                MirrorAction::Upload { path, oid } => {
                    let blob = self.load_blob(database, path, oid)?;
                    store.upload(path, &blob).await?;
                    report.uploaded += 1;
                }
                MirrorAction::Replace { path, oid } => {
                    let blob = self.load_blob(database, path, oid)?;
                    store.replace(path, &blob).await?;
                    report.replaced += 1;
                }
                MirrorAction::Delete { path } => {
                    store.delete(path).await?;
                    report.deleted += 1;
                }
            }
        }

        Ok(report)
    }

    fn load_blob(
        &self,
        database: &Database,
        path: &Path,
        oid: &ObjectId,
    ) -> anyhow::Result<bytes::Bytes> {
        let blob = database
            .parse_object_as_blob(oid)?
            .with_context(|| format!("object {} for {} is not a blob", oid, path.display()))?;

        Ok(blob.content().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::database::database_entry::DatabaseEntry;
    use crate::artifacts::objects::entry_mode::{EntryMode, FileMode};
    use std::collections::BTreeMap;

    fn entry(fill: char) -> DatabaseEntry {
        DatabaseEntry::new(
            ObjectId::try_parse(fill.to_string().repeat(40)).unwrap(),
            EntryMode::File(FileMode::Regular),
        )
    }

    #[test]
    fn plan_preserves_path_order_and_maps_change_kinds() {
        let mut changes: ChangeSet = BTreeMap::new();
        changes.insert(
            PathBuf::from("b/gone.txt"),
            TreeChangeType::Deleted(entry('a')),
        );
        changes.insert(PathBuf::from("a/new.txt"), TreeChangeType::Added(entry('b')));
        changes.insert(
            PathBuf::from("c/edit.txt"),
            TreeChangeType::Modified {
                old: entry('c'),
                new: entry('d'),
            },
        );

        let plan = MirrorPlan::from_changes(&changes);
        let kinds: Vec<_> = plan
            .actions()
            .iter()
            .map(|action| (action.path().to_path_buf(), matches!(action, MirrorAction::Delete { .. })))
            .collect();

        assert_eq!(
            kinds,
            vec![
                (PathBuf::from("a/new.txt"), false),
                (PathBuf::from("b/gone.txt"), true),
                (PathBuf::from("c/edit.txt"), false),
            ]
        );
        assert!(matches!(plan.actions()[0], MirrorAction::Upload { .. }));
        assert!(matches!(plan.actions()[2], MirrorAction::Replace { .. }));
    }

    #[test]
    fn empty_changeset_yields_an_empty_plan() {
        let plan = MirrorPlan::from_changes(&BTreeMap::new());
        assert!(plan.is_empty());
    }
}
