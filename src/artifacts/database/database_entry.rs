use crate::artifacts::objects::entry_mode::EntryMode;
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;

/// An (oid, mode) pair as recorded in a tree
///
/// Equality of two entries is the content comparison the differ relies on:
/// the oid is a hash of the blob bytes, so entries differ exactly when
/// content or mode differ.
#[derive(Debug, Clone, PartialEq, new)]
pub struct DatabaseEntry {
    pub oid: ObjectId,
    pub mode: EntryMode,
}

impl DatabaseEntry {
    pub fn is_tree(&self) -> bool {
        self.mode.is_tree()
    }
}
