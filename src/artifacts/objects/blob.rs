//! Blob object
//!
//! Blobs store file content. They contain only the raw file bytes, without
//! any metadata like filename or permissions (those are stored in trees).
//! Content is kept as raw bytes so binary files survive a backup unchanged.
//!
//! ## Format
//!
//! On disk: `blob <size>\0<content>`

use crate::artifacts::objects::entry_mode::FileMode;
use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use derive_new::new;
use std::io::{BufRead, Write};

/// Blob object representing file content
///
/// Each unique file content is stored as one blob, identified by its SHA-1
/// hash, so identical files across snapshots share storage.
#[derive(Debug, Clone, new)]
pub struct Blob {
    /// Raw file content
    content: Bytes,
    /// File mode (permissions)
    stat: FileMode,
}

impl Blob {
    /// Get the file mode (permissions)
    pub fn mode(&self) -> &FileMode {
        &self.stat
    }

    /// Get the raw file content
    pub fn content(&self) -> &Bytes {
        &self.content
    }
}

impl Packable for Blob {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut blob_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_type().as_str(), self.content.len());
        blob_bytes.write_all(header.as_bytes())?;
        blob_bytes.write_all(&self.content)?;

        Ok(Bytes::from(blob_bytes))
    }
}

impl Unpackable for Blob {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        // the header has already been read
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;

        Ok(Self::new(content.into(), Default::default()))
    }
}

impl Object for Blob {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blob
    }
}
