//! Atomic file store
//!
//! Opens a database file under the right lock and replaces it atomically.
//!
//! ## Commit Protocol
//! ```text
//!   1. write new bytes  → {path}.new   (exclusive lock, mode per name)
//!   2. fsync {path}.new                (SyncStrategy::Always)
//!   3. unlink {path}
//!   4. rename {path}.new → {path}
//!   5. fsync directory                 (SyncStrategy::Always)
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::os::unix::fs::{MetadataExt, OpenOptionsExt};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{Config, SyncStrategy};
use crate::error::{Result, StoreError};
use crate::path::Visibility;

use super::recovery::{recover, Intent, Recovery};
use super::{staging_path, LockGuard, LockMode};

/// Consecutive passes that must find neither file before we call the
/// database gone. A single pass can miss both while a commit is mid-replace.
const VANISHED_CONFIRMATIONS: usize = 3;

/// The two files that make up one database on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbFiles {
    /// Current committed generation
    pub committed: PathBuf,

    /// In-flight (or interrupted) next generation
    pub staging: PathBuf,
}

/// An open, locked database file
#[derive(Debug)]
pub struct FileHandle {
    guard: LockGuard,
    files: DbFiles,
    intent: Intent,
    recovery: Recovery,
}

impl FileHandle {
    /// Read the whole file from the start
    pub fn read_all(&mut self) -> Result<Vec<u8>> {
        let file = self.guard.file_mut();
        file.seek(SeekFrom::Start(0))?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    /// Path of the file actually opened (the staging file after window-B recovery)
    pub fn path(&self) -> &Path {
        self.guard.path()
    }

    pub fn files(&self) -> &DbFiles {
        &self.files
    }

    pub fn intent(&self) -> Intent {
        self.intent
    }

    /// What recovery did before this handle was handed out
    pub fn recovery(&self) -> Recovery {
        self.recovery
    }
}

/// Crash-safe open/commit protocol for database files
#[derive(Debug, Clone)]
pub struct FileStore {
    staging_suffix: String,
    sync_strategy: SyncStrategy,
}

impl FileStore {
    pub fn new(staging_suffix: impl Into<String>, sync_strategy: SyncStrategy) -> Self {
        Self {
            staging_suffix: staging_suffix.into(),
            sync_strategy,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.staging_suffix.clone(), config.sync_strategy)
    }

    /// Committed and staging paths for a committed path
    pub fn files(&self, path: &Path) -> DbFiles {
        DbFiles {
            committed: path.to_path_buf(),
            staging: staging_path(path, &self.staging_suffix),
        }
    }

    /// Open for reading under a shared lock
    pub fn open_for_read(&self, path: &Path) -> Result<FileHandle> {
        self.open(path, Intent::Read)
    }

    /// Open for reading the current contents under an exclusive lock
    pub fn open_for_write(&self, path: &Path) -> Result<FileHandle> {
        self.open(path, Intent::Write)
    }

    /// Recover, open and lock the database at `path`
    ///
    /// After the lock is granted we check that the path still names the
    /// locked inode: a writer may have committed a new generation while we
    /// were blocked, in which case we start over on the new file. There is
    /// no retry limit; only a database whose files are both gone fails.
    pub fn open(&self, path: &Path, intent: Intent) -> Result<FileHandle> {
        let files = self.files(path);
        let mut missing = 0;
        let mut attempt: u64 = 0;

        loop {
            attempt += 1;
            let mut recovery = Recovery::Clean;
            if !files.committed.exists() {
                recovery = recover(&files, intent)?;
            }

            let target = if recovery.reads_staging() {
                &files.staging
            } else {
                &files.committed
            };

            let file = match open_file(target, intent) {
                Ok(file) => file,
                // A concurrent commit moved the file away; look again.
                Err(StoreError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                    // Staging first: a commit creates it before the committed
                    // file goes away and renames it only after.
                    if files.staging.exists() || files.committed.exists() {
                        missing = 0;
                        continue;
                    }
                    missing += 1;
                    if missing < VANISHED_CONFIRMATIONS {
                        std::thread::yield_now();
                        continue;
                    }
                    return Err(StoreError::Io(e));
                }
                Err(e) => return Err(e),
            };
            missing = 0;
            let guard = LockGuard::acquire(file, target, intent.lock_mode())?;

            if !still_current(&guard)? {
                debug!(path = %target.display(), attempt, "file replaced while waiting for lock, reopening");
                continue;
            }

            if intent == Intent::Write {
                // Safe now: any writer that owned the staging file is gone.
                let cleanup = recover(&files, intent)?;
                if cleanup != Recovery::Clean {
                    recovery = cleanup;
                }
            }

            debug!(path = %target.display(), ?intent, ?recovery, "database opened");
            return Ok(FileHandle {
                guard,
                files,
                intent,
                recovery,
            });
        }
    }

    /// Atomically replace the committed file with `bytes`
    ///
    /// Requires a handle opened with write intent, whose exclusive lock keeps
    /// other cooperating writers out for the whole replace.
    pub fn commit(&self, handle: &FileHandle, visibility: Visibility, bytes: &[u8]) -> Result<()> {
        if handle.intent != Intent::Write {
            return Err(StoreError::Access {
                path: handle.files.committed.clone(),
                intent: handle.intent,
            });
        }

        let DbFiles { committed, staging } = &handle.files;

        // Step 1: Write the next generation to the staging file
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(visibility.file_mode())
            .open(staging)
            .map_err(|e| StoreError::path(staging, e))?;
        let mut guard = LockGuard::acquire(file, staging, LockMode::Exclusive)?;
        visibility
            .apply(staging)
            .map_err(|e| StoreError::path(staging, e))?;
        guard.file_mut().write_all(bytes)?;

        // Step 2: Staging must be complete on disk before the old copy goes
        if self.sync_strategy == SyncStrategy::Always {
            guard.file().sync_all()?;
        }
        drop(guard);

        // Step 3 + 4: Replace
        match fs::remove_file(committed) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        match fs::rename(staging, committed) {
            Ok(()) => {}
            // A concurrent opener saw the half-done replace and finished it for us.
            Err(e) if e.kind() == io::ErrorKind::NotFound && committed.exists() => {}
            Err(e) => return Err(e.into()),
        }

        // Step 5: Make the rename itself durable
        if self.sync_strategy == SyncStrategy::Always {
            if let Some(dir) = committed.parent() {
                File::open(dir)?.sync_all()?;
            }
        }

        debug!(path = %committed.display(), bytes = bytes.len(), "committed");
        Ok(())
    }
}

// =============================================================================
// Private Helpers
// =============================================================================

/// Open a database file with the access the intent needs
fn open_file(path: &Path, intent: Intent) -> Result<File> {
    OpenOptions::new()
        .read(true)
        .write(intent == Intent::Write)
        .open(path)
        .map_err(|e| match e.kind() {
            io::ErrorKind::PermissionDenied => StoreError::Access {
                path: path.to_path_buf(),
                intent,
            },
            _ => StoreError::Io(e),
        })
}

/// True if the guard's path still refers to the inode it locked
fn still_current(guard: &LockGuard) -> Result<bool> {
    let locked = guard.file().metadata()?;
    match fs::metadata(guard.path()) {
        Ok(on_disk) => Ok(locked.dev() == on_disk.dev() && locked.ino() == on_disk.ino()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}
