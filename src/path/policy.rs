//! Permission policy
//!
//! The database name alone decides who may read the file: names starting
//! with [`PRIVATE_MARKER`] are owner-only, everything else is world-readable.

use std::fs::{self, Permissions};
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

/// Leading character that marks a database as private
pub const PRIVATE_MARKER: char = '.';

/// Mode for created database directories (rwxr-xr-x)
pub const DIR_MODE: u32 = 0o755;

/// Mode for public database files (rw-r--r--)
pub const PUBLIC_FILE_MODE: u32 = 0o644;

/// Mode for private database files (rw-------)
pub const PRIVATE_FILE_MODE: u32 = 0o600;

/// Permission class of a database
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    /// Derive the permission class from a database name
    pub fn of(name: &str) -> Self {
        if name.starts_with(PRIVATE_MARKER) {
            Visibility::Private
        } else {
            Visibility::Public
        }
    }

    /// Unix mode bits for files of this class
    pub fn file_mode(self) -> u32 {
        match self {
            Visibility::Public => PUBLIC_FILE_MODE,
            Visibility::Private => PRIVATE_FILE_MODE,
        }
    }

    /// Chmod `path` to this class's mode, ignoring the process umask
    pub fn apply(self, path: &Path) -> io::Result<()> {
        fs::set_permissions(path, Permissions::from_mode(self.file_mode()))
    }
}
