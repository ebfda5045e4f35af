//! Command implementations
//!
//! Organized into two categories:
//!
//! - `plumbing`: Low-level inspection of recorded snapshots (ls-files)
//! - `porcelain`: User-facing backup workflows (init, snapshot, log, diff,
//!   sync)

pub mod plumbing;
pub mod porcelain;
