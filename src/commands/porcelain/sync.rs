use crate::areas::repository::Repository;
use crate::artifacts::mirror::plan::MirrorPlan;
use crate::artifacts::mirror::store::MirrorStore;
use anyhow::Context;
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// Replay the changeset between the last mirrored snapshot and HEAD
    /// onto the destination store
    ///
    /// The mirror marker only advances once the whole plan has applied, so
    /// an interrupted run is retried in full on the next invocation.
    pub async fn sync<S: MirrorStore>(&mut self, store: &S, dry_run: bool) -> anyhow::Result<()> {
        let head = self
            .refs()
            .read_head()?
            .context("nothing to mirror: no snapshots recorded")?;
        let last_mirrored = self.refs().read_mirror()?;

        if last_mirrored.as_ref() == Some(&head) {
            writeln!(self.writer(), "Mirror already up to date")?;
            return Ok(());
        }

        let tree_diff = self
            .database()
            .tree_diff(last_mirrored.as_ref(), Some(&head))?;
        let plan = MirrorPlan::from_changes(tree_diff.changes());

        if dry_run {
            for action in plan.actions() {
                writeln!(self.writer(), "{}", action.display())?;
            }
            writeln!(
                self.writer(),
                "Would mirror {} change(s) to {}",
                plan.actions().len(),
                store.describe()
            )?;
            return Ok(());
        }

        // A snapshot with no file changes against the mirror still advances
        // the marker so the next run starts from here.
        let report = plan.apply(self.database(), store).await?;
        self.refs().update_mirror(head.clone())?;

        writeln!(
            self.writer(),
            "Mirrored {} change(s) to {} ({})",
            report.total(),
            store.describe(),
            report.summary()
        )?;
        writeln!(
            self.writer(),
            "{}",
            format!("Mirror now at [{}]", head.to_short_oid()).bold()
        )?;

        Ok(())
    }
}
