//! Error types for dotstore
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::file::Intent;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for dotstore operations
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    #[error("database not found: {name}")]
    NotFound { name: String },

    // -------------------------------------------------------------------------
    // Filesystem Errors
    // -------------------------------------------------------------------------
    #[error("cannot create {}: {source}", .path.display())]
    Path {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot lock {}: {source}", .path.display())]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("permission denied opening {} for {intent:?} access", .path.display())]
    Access { path: PathBuf, intent: Intent },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("cannot decode {}: {message}", .path.display())]
    Codec { path: PathBuf, message: String },

    #[error("cannot convert value at key {key:?}: {message}")]
    Convert { key: String, message: String },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    pub(crate) fn path(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Path {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn codec(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Codec {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// True for the not-found condition
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
