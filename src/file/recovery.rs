//! Crash recovery
//!
//! A commit goes through two windows where a crash leaves extra state:
//!
//! ```text
//!   write staging ──► remove committed ──► rename staging → committed
//!   └── window A ──┘  └────────────── window B ─────────────┘
//! ```
//!
//! - Window A: committed + staging present. Staging may be truncated, so a
//!   writer throws it away. A reader ignores it.
//! - Window B: only staging present. Staging was fully written before the
//!   committed file was removed, so it is the newest generation. A reader
//!   reads it in place, a writer finishes the rename.

use std::fs;
use std::io;

use tracing::{info, warn};

use crate::error::Result;

use super::{DbFiles, LockMode};

/// What the caller intends to do with the database
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Read,
    Write,
}

impl Intent {
    /// Lock mode matching this intent
    pub fn lock_mode(self) -> LockMode {
        match self {
            Intent::Read => LockMode::Shared,
            Intent::Write => LockMode::Exclusive,
        }
    }
}

/// Outcome of a recovery pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Nothing to repair; use the committed file
    Clean,

    /// Committed file missing; read the staging file in its place
    ReadStaging,

    /// Committed file missing; the pending rename was completed
    FinishedRename,

    /// A half-written staging file was deleted
    DiscardedStaging,
}

impl Recovery {
    /// True when the staging file should be opened instead of the committed one
    pub fn reads_staging(self) -> bool {
        matches!(self, Recovery::ReadStaging)
    }
}

/// Repair the on-disk state of one database for the given intent
///
/// Deleting a staging file is only safe while holding the exclusive lock on
/// the committed file, otherwise it may belong to a writer still in flight.
/// [`FileStore`](super::FileStore) arranges that.
pub fn recover(files: &DbFiles, intent: Intent) -> Result<Recovery> {
    let committed = files.committed.exists();
    let staging = files.staging.exists();

    let outcome = match (committed, staging, intent) {
        (false, true, Intent::Read) => {
            info!(path = %files.staging.display(), "reading staging file left by interrupted commit");
            Recovery::ReadStaging
        }
        (false, true, Intent::Write) => {
            match fs::rename(&files.staging, &files.committed) {
                Ok(()) => {
                    info!(path = %files.committed.display(), "finished interrupted commit");
                }
                // Another writer finished it first.
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
            Recovery::FinishedRename
        }
        (true, true, Intent::Write) => {
            match fs::remove_file(&files.staging) {
                Ok(()) => {
                    warn!(path = %files.staging.display(), "discarded staging file from interrupted write");
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
            Recovery::DiscardedStaging
        }
        _ => Recovery::Clean,
    };

    Ok(outcome)
}
