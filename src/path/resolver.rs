//! Path resolver
//!
//! Maps database names to files inside the storage directories.

use std::fs::{self, DirBuilder, OpenOptions, Permissions};
use std::io::{self, Write};
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};

use serde_json::Map;
use tracing::debug;

use crate::config::Config;
use crate::document::codec;
use crate::error::{Result, StoreError};
use crate::file::{staging_path, LockGuard, LockMode};

use super::{Visibility, DIR_MODE};

/// Resolves and creates database files
///
/// The directory list is fixed at construction from the injected
/// [`Config::identity`], so lookups and creation always agree on order.
#[derive(Debug, Clone)]
pub struct PathResolver {
    /// Storage directories in search order; the first one receives new databases
    dirs: Vec<PathBuf>,

    /// Extension of committed files
    extension: String,

    /// Suffix of staging files
    staging_suffix: String,
}

impl PathResolver {
    /// Build a resolver for the configured identity
    ///
    /// Privileged identities only ever see the global directory.
    /// Unprivileged identities search the user directory, then the global one.
    pub fn new(config: &Config) -> Result<Self> {
        let dirs = if config.identity.is_privileged() {
            vec![config.global_dir.clone()]
        } else {
            let user_dir = config.user_dir.clone().ok_or_else(|| {
                StoreError::Config("no user directory (home directory unknown)".to_string())
            })?;
            vec![user_dir, config.global_dir.clone()]
        };

        Ok(Self {
            dirs,
            extension: config.extension.clone(),
            staging_suffix: config.staging_suffix.clone(),
        })
    }

    /// Storage directories in search order
    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Path of the committed file for `name` inside `dir`
    pub fn db_path(&self, dir: &Path, name: &str) -> PathBuf {
        dir.join(format!("{}.{}", name, self.extension))
    }

    /// Find an existing database
    ///
    /// A database exists in a directory when either its committed file or
    /// its staging file is present there (the latter means a commit was
    /// interrupted mid-rename). Returns the committed path of the first match.
    pub fn resolve(&self, name: &str) -> Result<Option<PathBuf>> {
        validate_name(name)?;

        for dir in &self.dirs {
            let path = self.db_path(dir, name);
            let staging = staging_path(&path, &self.staging_suffix);
            if path.exists() || staging.exists() {
                debug!(name, path = %path.display(), "resolved database");
                return Ok(Some(path));
            }
        }

        debug!(name, "database not found in any search directory");
        Ok(None)
    }

    /// Create a new, empty database in the preferred directory
    ///
    /// Fails if the directory cannot be created or the file already exists;
    /// callers check [`resolve`](Self::resolve) first.
    pub fn create(&self, name: &str) -> Result<PathBuf> {
        validate_name(name)?;

        let dir = self.ensure_dir()?;
        let path = self.db_path(dir, name);
        let visibility = Visibility::of(name);

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .mode(visibility.file_mode())
            .open(&path)
            .map_err(|e| StoreError::path(&path, e))?;

        // Hold the lock while the empty mapping goes in, so a concurrent
        // reader never decodes a zero-length file we are still writing.
        let mut guard = LockGuard::acquire(file, &path, LockMode::Exclusive)?;

        let bytes = codec::encode(&Map::new()).map_err(|e| StoreError::codec(&path, e))?;
        guard
            .file_mut()
            .write_all(&bytes)
            .and_then(|()| guard.file_mut().sync_all())
            .map_err(|e| StoreError::path(&path, e))?;

        // The umask may have narrowed the creation mode.
        visibility
            .apply(&path)
            .map_err(|e| StoreError::path(&path, e))?;

        debug!(name, path = %path.display(), ?visibility, "created database");
        Ok(path)
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Make sure the preferred directory exists (rwxr-xr-x)
    fn ensure_dir(&self) -> Result<&Path> {
        let dir = self
            .dirs
            .first()
            .ok_or_else(|| StoreError::Config("no storage directories".to_string()))?;

        if !dir.exists() {
            DirBuilder::new()
                .recursive(true)
                .mode(DIR_MODE)
                .create(dir)
                .map_err(|e| StoreError::path(dir, e))?;
            fs::set_permissions(dir, Permissions::from_mode(DIR_MODE))
                .map_err(|e| StoreError::path(dir, e))?;
            debug!(dir = %dir.display(), "created storage directory");
        }

        Ok(dir)
    }
}

/// Reject names that would escape the storage directory
fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains('/') || name.contains('\0') {
        return Err(StoreError::path(
            name,
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "database name must be non-empty and contain no '/' or NUL",
            ),
        ));
    }
    Ok(())
}
