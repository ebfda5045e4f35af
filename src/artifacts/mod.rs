//! Data structures and algorithms
//!
//! - `branch`: Ref names and revision parsing
//! - `core`: Shared utilities (pager wrapper)
//! - `database`: Database entry types
//! - `diff`: The recursive two-snapshot differ
//! - `mirror`: The changeset → remote-store pipeline
//! - `objects`: Object types (blob, tree, commit)
//! - `snapshot`: Workspace scan entries and the revision tree walker

pub mod branch;
pub mod core;
pub mod database;
pub mod diff;
pub mod mirror;
pub mod objects;
pub mod snapshot;
