use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::diff::tree_diff::DiffFilter;
use anyhow::Context;
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// Print the changeset between two snapshots, one name-status line per
    /// path (`A`/`D`/`M`, tab, path), in path order
    pub fn diff_snapshots(
        &mut self,
        old: &str,
        new: &str,
        filter: DiffFilter,
    ) -> anyhow::Result<()> {
        let old_oid = Revision::parse(old)?
            .resolve_required(self)
            .with_context(|| format!("unknown revision: {}", old))?;
        let new_oid = Revision::parse(new)?
            .resolve_required(self)
            .with_context(|| format!("unknown revision: {}", new))?;

        let tree_diff = self.database().tree_diff(Some(&old_oid), Some(&new_oid))?;

        for (path, change) in tree_diff.changes() {
            if !change.matches_filter(filter) {
                continue;
            }

            let status = match change.status_char() {
                'A' => "A".green(),
                'D' => "D".red(),
                status => status.to_string().yellow(),
            };

            writeln!(self.writer(), "{}\t{}", status, path.display())?;
        }

        Ok(())
    }
}
