use crate::areas::repository::Repository;
use anyhow::Context;
use std::fs;
use std::io::Write;

const DEFAULT_BRANCH: &str = "master";

impl Repository {
    pub fn init(&mut self) -> anyhow::Result<()> {
        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create objects directory")?;

        fs::create_dir_all(self.refs().refs_path()).context("Failed to create refs directory")?;

        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create refs/heads directory")?;

        fs::create_dir_all(self.refs().mirrors_path())
            .context("Failed to create refs/mirrors directory")?;

        self.refs()
            .set_head(
                DEFAULT_BRANCH,
                format!("ref: refs/heads/{}", DEFAULT_BRANCH),
            )
            .context("Failed to create initial HEAD reference")?;

        // make sure the DEFAULT_BRANCH file exists
        let head_ref_path = self.refs().heads_path().join(DEFAULT_BRANCH);
        if !head_ref_path.exists() {
            fs::write(&head_ref_path, b"").context("Failed to create default branch file")?;
        }

        write!(
            self.writer(),
            "Initialized empty backup repository in {}",
            self.path().display()
        )?;

        Ok(())
    }
}
