use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::Object;
use std::io::Write;

#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Start of the walk; defaults to HEAD
    pub revision: Option<String>,
    pub oneline: bool,
}

impl Repository {
    /// Walk snapshot history newest-first from HEAD (or a given revision)
    pub fn log(&mut self, opts: &LogOptions) -> anyhow::Result<()> {
        let mut curr_commit_oid = match &opts.revision {
            Some(revision) => Some(Revision::parse(revision)?.resolve_required(self)?),
            None => self.refs().read_head()?,
        };

        while let Some(commit_oid) = curr_commit_oid {
            let commit = self
                .database()
                .parse_object_as_commit(&commit_oid)?
                .ok_or_else(|| anyhow::anyhow!("Snapshot object not found: {}", commit_oid))?;

            if opts.oneline {
                self.show_snapshot_oneline(&commit)?;
            } else {
                self.show_snapshot_medium(&commit)?;
                writeln!(self.writer())?;
            }

            // Move to the parent snapshot for the next iteration
            curr_commit_oid = commit.parent().cloned();
        }

        Ok(())
    }

    fn show_snapshot_medium(&self, commit: &Commit) -> anyhow::Result<()> {
        writeln!(self.writer(), "snapshot {}", commit.object_id()?)?;
        writeln!(self.writer(), "Author: {}", commit.author().display_name())?;
        writeln!(
            self.writer(),
            "Date:   {}",
            commit.author().readable_timestamp()
        )?;
        writeln!(self.writer())?;
        for message_line in commit.message().lines() {
            writeln!(self.writer(), "    {}", message_line)?;
        }

        Ok(())
    }

    fn show_snapshot_oneline(&self, commit: &Commit) -> anyhow::Result<()> {
        writeln!(
            self.writer(),
            "{} {}",
            commit.object_id()?.to_short_oid(),
            commit.short_message()
        )?;

        Ok(())
    }
}
