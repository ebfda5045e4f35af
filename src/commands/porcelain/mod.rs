//! Porcelain commands (user-facing backup operations)
//!
//! - `init`: Initialize a backup repository
//! - `snapshot`: Record a snapshot of the backup directory
//! - `log`: Show snapshot history
//! - `diff`: Show the changeset between two snapshots
//! - `sync`: Replay the pending changeset onto the mirror

pub mod diff;
pub mod init;
pub mod log;
pub mod snapshot;
pub mod sync;
