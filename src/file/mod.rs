//! File Module
//!
//! Crash-safe storage of a single database file.
//!
//! ## Responsibilities
//! - Shared locks for readers, exclusive locks for writers
//! - Atomic replace of the committed file through a staging file
//! - Self-healing after a crash in either commit window
//!
//! ## Generations On Disk
//! ```text
//! ┌──────────────────────┬──────────────────────┬──────────────────────────┐
//! │ committed            │ staging              │ meaning                  │
//! ├──────────────────────┼──────────────────────┼──────────────────────────┤
//! │ present              │ absent               │ steady state             │
//! │ present              │ present              │ crashed writing staging  │
//! │ absent               │ present              │ crashed mid-replace      │
//! └──────────────────────┴──────────────────────┴──────────────────────────┘
//! ```

mod lock;
mod recovery;
mod store;

use std::path::{Path, PathBuf};

pub use lock::{LockGuard, LockMode};
pub use recovery::{recover, Intent, Recovery};
pub use store::{DbFiles, FileHandle, FileStore};

/// Staging path for a committed path: `{path}.{suffix}`
pub fn staging_path(path: &Path, suffix: &str) -> PathBuf {
    let mut staging = path.as_os_str().to_owned();
    staging.push(".");
    staging.push(suffix);
    PathBuf::from(staging)
}
