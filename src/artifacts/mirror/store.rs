use anyhow::Context;
use derive_new::new;
use std::path::{Path, PathBuf};

/// Destination seam of the mirror pipeline
///
/// Implementations receive paths relative to the backup directory root and
/// raw blob bytes. Provider concerns beyond create/update/delete (folder
/// bookkeeping, quotas, retries) stay behind the implementation.
#[allow(async_fn_in_trait)]
pub trait MirrorStore {
    /// Human-readable destination label for messages
    fn describe(&self) -> String;

    /// Create a file that does not exist on the mirror yet
    async fn upload(&self, path: &Path, content: &[u8]) -> anyhow::Result<()>;

    /// Overwrite a file that already exists on the mirror
    async fn replace(&self, path: &Path, content: &[u8]) -> anyhow::Result<()>;

    /// Remove a file from the mirror
    async fn delete(&self, path: &Path) -> anyhow::Result<()>;
}

/// Filesystem-backed mirror: replays the changeset into a directory
#[derive(Debug, Clone, new)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn write_file(&self, path: &Path, content: &[u8]) -> anyhow::Result<()> {
        let target = self.root.join(path);

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Unable to create mirror directory {}", parent.display()))?;
        }

        tokio::fs::write(&target, content)
            .await
            .with_context(|| format!("Unable to write mirror file {}", target.display()))
    }

    // Deleting the last file of a directory leaves the directory behind;
    // walk back up towards the mirror root removing the empty shells.
    async fn prune_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        let mut current = path.to_path_buf();

        while current.starts_with(&self.root) && current != self.root {
            let mut entries = tokio::fs::read_dir(&current).await?;
            if entries.next_entry().await?.is_some() {
                break;
            }

            tokio::fs::remove_dir(&current)
                .await
                .with_context(|| format!("Unable to prune mirror directory {}", current.display()))?;

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(())
    }
}

impl MirrorStore for DirStore {
    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    async fn upload(&self, path: &Path, content: &[u8]) -> anyhow::Result<()> {
        self.write_file(path, content).await
    }

    async fn replace(&self, path: &Path, content: &[u8]) -> anyhow::Result<()> {
        self.write_file(path, content).await
    }

    async fn delete(&self, path: &Path) -> anyhow::Result<()> {
        let target = self.root.join(path);

        tokio::fs::remove_file(&target)
            .await
            .with_context(|| format!("Unable to delete mirror file {}", target.display()))?;

        if let Some(parent) = target.parent() {
            self.prune_empty_parent_dirs(parent).await?;
        }

        Ok(())
    }
}
