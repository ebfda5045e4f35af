use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::snapshot::walker::TreeWalker;
use std::io::Write;

impl Repository {
    /// List every file recorded in a snapshot, in path order
    ///
    /// With `long`, each line carries the entry mode and blob oid as well.
    pub fn ls_files(&mut self, revision: &str, long: bool) -> anyhow::Result<()> {
        let oid = Revision::parse(revision)?.resolve_required(self)?;

        let files = TreeWalker::new(self.database()).walk(&oid)?;

        for (path, entry) in &files {
            if long {
                writeln!(
                    self.writer(),
                    "{} {}\t{}",
                    entry.mode.as_str(),
                    entry.oid,
                    path.display()
                )?;
            } else {
                writeln!(self.writer(), "{}", path.display())?;
            }
        }

        Ok(())
    }
}
