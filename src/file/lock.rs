//! Advisory file locks
//!
//! fs2 advisory locks taken directly on the database file:
//! - Shared: any number of readers.
//! - Exclusive: one writer, excludes readers and other writers.
//!
//! Locks are cooperative and only serialize processes that use them.
//! The lock is released when the guard drops.

use std::fs::File;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::trace;

use crate::error::{Result, StoreError};

/// Lock flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    Shared,
    Exclusive,
}

/// An open file holding an advisory lock
#[derive(Debug)]
pub struct LockGuard {
    file: File,
    path: PathBuf,
    mode: LockMode,
}

impl LockGuard {
    /// Lock `file` in the requested mode. Blocks until acquired.
    pub fn acquire(file: File, path: &Path, mode: LockMode) -> Result<Self> {
        let locked = match mode {
            LockMode::Shared => file.lock_shared(),
            LockMode::Exclusive => file.lock_exclusive(),
        };
        locked.map_err(|source| StoreError::Lock {
            path: path.to_path_buf(),
            source,
        })?;

        trace!(path = %path.display(), ?mode, "lock acquired");
        Ok(Self {
            file,
            path: path.to_path_buf(),
            mode,
        })
    }

    pub fn file(&self) -> &File {
        &self.file
    }

    pub fn file_mut(&mut self) -> &mut File {
        &mut self.file
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        // Closing the descriptor releases the lock anyway.
        let _ = self.file.unlock();
        trace!(path = %self.path.display(), mode = ?self.mode, "lock released");
    }
}
