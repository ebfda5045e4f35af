use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::entry_mode::FileMode;
use anyhow::Context;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// `.git` is skipped alongside our own metadata so a backup directory that is
// also a git checkout never mirrors its repository internals.
const IGNORED_PATHS: [&str; 4] = [".bak", ".git", ".", ".."];

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn parse_blob(&self, path: &Path) -> anyhow::Result<Blob> {
        let data = self.read_file(path)?;
        let mode = self.stat_file(path);

        Ok(Blob::new(data, mode))
    }

    /// Every regular file under the workspace, relative to its root
    pub fn list_files(&self) -> anyhow::Result<Vec<PathBuf>> {
        if !self.path.exists() {
            anyhow::bail!("The backup directory does not exist: {:?}", self.path);
        }

        let mut files = WalkDir::new(self.path.as_ref())
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| self.check_if_not_ignored_file_path(entry.path()))
            .collect::<Vec<_>>();
        files.sort();

        Ok(files)
    }

    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<Bytes> {
        let file_path = self.path.join(file_path);

        let content = std::fs::read(&file_path)
            .with_context(|| format!("Unable to read file {}", file_path.display()))?;

        Ok(content.into())
    }

    pub fn stat_file(&self, file_path: &Path) -> FileMode {
        if is_executable::is_executable(self.path.join(file_path)) {
            FileMode::Executable
        } else {
            FileMode::Regular
        }
    }

    fn is_ignored(path: &Path) -> bool {
        // Check if any component of the path is in IGNORED_PATHS
        path.components().any(|component| {
            if let std::path::Component::Normal(name) = component {
                let name_str = name.to_string_lossy();
                IGNORED_PATHS.contains(&name_str.as_ref())
            } else {
                false
            }
        })
    }

    fn check_if_not_ignored_file_path(&self, path: &Path) -> Option<PathBuf> {
        if path.is_file() && !Self::is_ignored(path) {
            Some(path.strip_prefix(self.path.as_ref()).ok()?.to_path_buf())
        } else {
            None
        }
    }
}
