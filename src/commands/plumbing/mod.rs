//! Plumbing commands (snapshot inspection)
//!
//! - `ls-files`: List every file recorded in a snapshot

pub mod ls_files;
