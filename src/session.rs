//! Session Module
//!
//! Ties path resolution, the file store and the document together.
//!
//! ## Responsibilities
//! - Find or create the database for a name
//! - Open it with the right lock and decode it
//! - Hand the caller a root accessor
//! - Commit if the caller changed something (write mode only)
//! - Release the lock and the decoded state on every exit path

use std::io;
use std::path::PathBuf;

use tracing::debug;

use crate::config::Config;
use crate::document::{Document, KeyAccessor};
use crate::error::{Result, StoreError};
use crate::file::{FileStore, Intent};
use crate::path::{PathResolver, Visibility};

/// Options for [`Session::open`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenOptions {
    /// Open read-only: shared lock, the database must exist, and changes
    /// made through the accessor are never persisted
    pub read: bool,
}

impl OpenOptions {
    pub fn read_only() -> Self {
        Self { read: true }
    }

    pub fn read_write() -> Self {
        Self { read: false }
    }

    fn intent(self) -> Intent {
        if self.read {
            Intent::Read
        } else {
            Intent::Write
        }
    }
}

/// Entry point for opening databases
///
/// Holds no open files between calls; each `open` loads the database from
/// disk and, if needed, saves it back before returning.
#[derive(Debug, Clone)]
pub struct Session {
    config: Config,
    resolver: PathResolver,
    files: FileStore,
}

impl Session {
    /// Create a session for the given config
    pub fn new(config: Config) -> Result<Self> {
        let resolver = PathResolver::new(&config)?;
        let files = FileStore::from_config(&config);
        Ok(Self {
            config,
            resolver,
            files,
        })
    }

    /// Open database `name`, run `f` on its root accessor, then commit
    /// any changes (unless opened read-only)
    pub fn open<F, R>(&self, name: &str, options: OpenOptions, f: F) -> Result<R>
    where
        F: FnOnce(KeyAccessor<'_>) -> R,
    {
        self.try_open(name, options, |db| Ok::<R, StoreError>(f(db)))
    }

    /// Like [`open`](Self::open), but `f` may fail. On `Err` nothing is
    /// committed; the lock is released either way.
    pub fn try_open<F, R, E>(&self, name: &str, options: OpenOptions, f: F) -> std::result::Result<R, E>
    where
        F: FnOnce(KeyAccessor<'_>) -> std::result::Result<R, E>,
        E: From<StoreError>,
    {
        let intent = options.intent();

        // Step 1: Find or create
        let path = self.locate(name, options)?;

        // Step 2: Open under lock and decode
        let mut handle = self.files.open(&path, intent)?;
        let bytes = handle.read_all()?;
        let document = Document::decode(&bytes)
            .map_err(|e| StoreError::codec(handle.path(), e))?;
        let document = ClosingDocument(document);

        // Step 3: Caller logic
        let value = f(document.0.root())?;

        // Step 4: Commit changes
        if document.0.is_dirty() {
            if intent == Intent::Write {
                let bytes = document
                    .0
                    .encode()
                    .map_err(|e| StoreError::codec(&path, e))?;
                self.files.commit(&handle, Visibility::of(name), &bytes)?;
            } else {
                debug!(name, "discarding changes made in read-only session");
            }
        }

        // Step 5: document closes, then the handle drops and unlocks
        drop(document);
        drop(handle);

        Ok(value)
    }

    /// Path of an existing database, if any
    pub fn find(&self, name: &str) -> Result<Option<PathBuf>> {
        self.resolver.resolve(name)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn locate(&self, name: &str, options: OpenOptions) -> Result<PathBuf> {
        match self.resolver.resolve(name)? {
            Some(path) => Ok(path),
            None if options.read => Err(StoreError::NotFound {
                name: name.to_string(),
            }),
            None => match self.resolver.create(name) {
                Ok(path) => Ok(path),
                // Another session created it first; use theirs.
                Err(StoreError::Path { ref source, .. })
                    if source.kind() == io::ErrorKind::AlreadyExists =>
                {
                    debug!(name, "lost create race, resolving again");
                    self.resolver.resolve(name)?.ok_or_else(|| StoreError::NotFound {
                        name: name.to_string(),
                    })
                }
                Err(e) => Err(e),
            },
        }
    }
}

/// Open a database using [`Config::default`]
pub fn open_database<F, R>(name: &str, options: OpenOptions, f: F) -> Result<R>
where
    F: FnOnce(KeyAccessor<'_>) -> R,
{
    Session::new(Config::default())?.open(name, options, f)
}

/// Closes the wrapped document on every exit path, including unwinding
struct ClosingDocument(Document);

impl Drop for ClosingDocument {
    fn drop(&mut self) {
        self.0.close();
    }
}
