//! Core repository components
//!
//! The fundamental building blocks of a backup repository:
//!
//! - `database`: Object database for storing blobs, trees, and commits
//! - `refs`: Reference management (HEAD, snapshot branch, mirror marker)
//! - `repository`: High-level wiring and coordination
//! - `workspace`: Backup directory file system operations

pub mod database;
pub mod refs;
pub mod repository;
pub mod workspace;
