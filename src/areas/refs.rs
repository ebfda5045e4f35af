//! References (snapshot branch, HEAD, mirror marker)
//!
//! References are human-readable names pointing at snapshots, stored as
//! text files containing either a 40-character SHA-1 (direct reference) or
//! `ref: <path>` (symbolic reference).
//!
//! ## Reference types
//!
//! - HEAD: symbolic reference to the snapshot branch tip
//! - Heads: `refs/heads/*`, the latest snapshot per branch
//! - Mirrors: `refs/mirrors/*`, the last snapshot successfully replayed to
//!   a destination, which is the low endpoint of every incremental sync

use crate::artifacts::branch::branch_name::{RefName, SymRefName};
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::io::Write;
use std::ops::DerefMut;
use std::path::Path;

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

/// Ref name recording the last mirrored snapshot
const MIRROR_REF: &str = "mirrors/default";

/// References manager
///
/// Handles reading and writing references with exclusive file locking on
/// updates.
#[derive(Debug, new)]
pub struct Refs {
    /// Path to the metadata directory (typically `.bak`)
    path: Box<Path>,
}

/// Internal representation of a reference value
#[derive(Debug, Clone)]
enum SymRefOrOid {
    /// Symbolic reference pointing to another ref
    SymRef { sym_ref_name: SymRefName },
    /// Direct object ID
    Oid(ObjectId),
}

impl SymRefOrOid {
    fn read_symref_or_oid(path: &Path) -> anyhow::Result<Option<SymRefOrOid>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)?;
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        let symref_match = regex::Regex::new(SYMREF_REGEX)?.captures(content);
        if let Some(symref_match) = symref_match {
            Ok(Some(SymRefOrOid::SymRef {
                sym_ref_name: SymRefName::new(symref_match[1].to_string()),
            }))
        } else {
            Ok(Some(SymRefOrOid::Oid(ObjectId::try_parse(
                content.to_string(),
            )?)))
        }
    }
}

impl Refs {
    /// Read a symbolic reference, following indirection
    fn read_symref(&self, path: &Path) -> anyhow::Result<Option<ObjectId>> {
        let ref_content = SymRefOrOid::read_symref_or_oid(path)?;

        match ref_content {
            Some(SymRefOrOid::SymRef { sym_ref_name }) => {
                self.read_symref(self.path.join(sym_ref_name.as_ref_path()).as_path())
            }
            Some(SymRefOrOid::Oid(oid)) => Ok(Some(oid)),
            None => Ok(None),
        }
    }

    /// Update a symbolic reference to point to a new snapshot
    ///
    /// Follows the symref chain and updates the final target under an
    /// exclusive lock.
    fn update_symref(&self, path: &Path, oid: ObjectId) -> anyhow::Result<()> {
        let mut ref_file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .with_context(|| format!("failed to open ref file at {:?}", path))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;

        let ref_content = SymRefOrOid::read_symref_or_oid(path)?;

        match ref_content {
            Some(SymRefOrOid::SymRef { sym_ref_name }) => {
                let target_path = self.path.join(sym_ref_name.as_ref_path());
                self.update_symref(target_path.as_path(), oid)
            }
            Some(SymRefOrOid::Oid(_)) | None => {
                lock.deref_mut().write_all(oid.as_ref().as_bytes())?;
                Ok(())
            }
        }
    }

    pub fn set_head(&self, branch: &str, raw_ref: String) -> anyhow::Result<()> {
        let branch_path = self.heads_path().join(branch).into_boxed_path();

        if branch_path.exists() {
            self.update_ref_file(self.head_path(), format!("ref: refs/heads/{}", branch))
        } else {
            self.update_ref_file(self.head_path(), raw_ref)
        }
    }

    pub fn update_head(&self, oid: ObjectId) -> anyhow::Result<()> {
        self.update_symref(self.head_path().as_ref(), oid)
    }

    pub fn read_head(&self) -> anyhow::Result<Option<ObjectId>> {
        self.read_symref(&self.head_path())
    }

    /// The last snapshot replayed to the mirror, if any sync ever finished
    pub fn read_mirror(&self) -> anyhow::Result<Option<ObjectId>> {
        self.read_symref(&self.mirror_path())
    }

    /// Advance the mirror marker; only called after a plan fully applied
    pub fn update_mirror(&self, oid: ObjectId) -> anyhow::Result<()> {
        self.update_ref_file(self.mirror_path(), oid.as_ref().to_string())
    }

    pub fn update_ref_file(&self, path: Box<Path>, raw_ref: String) -> anyhow::Result<()> {
        // create all the parent directories if they don't exist
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!(
                "failed to create parent directories for ref file at {:?}",
                path
            )
        })?)?;

        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path.clone())
            .with_context(|| format!("failed to open ref file at {:?}", path))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(raw_ref.as_bytes())?;

        Ok(())
    }

    pub fn read_ref(&self, ref_name: RefName) -> anyhow::Result<Option<ObjectId>> {
        let ref_path = self.find_path_to_ref(ref_name)?;
        self.read_symref(&ref_path)
    }

    fn find_path_to_ref(&self, ref_name: RefName) -> anyhow::Result<Box<Path>> {
        // search for the ref file in .bak, .bak/refs and .bak/refs/heads
        [self.path.clone(), self.refs_path(), self.heads_path()]
            .iter()
            .map(|base_path| base_path.join(ref_name.as_ref()).into_boxed_path())
            .find(|path| path.exists())
            .ok_or_else(|| anyhow::anyhow!("ref {} not found", ref_name))
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join("HEAD").into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }

    pub fn mirrors_path(&self) -> Box<Path> {
        self.refs_path().join("mirrors").into_boxed_path()
    }

    fn mirror_path(&self) -> Box<Path> {
        self.refs_path().join(MIRROR_REF).into_boxed_path()
    }
}
