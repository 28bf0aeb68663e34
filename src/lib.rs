//! # dotstore
//!
//! A small crash-safe, file-backed key-value store for configuration data:
//! - Dotted hierarchical keys (`really.long.flag`) over a flat mapping
//! - Per-user and machine-global databases
//! - Advisory locking (shared readers, exclusive writer)
//! - Atomic commits that heal themselves after a crash
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Session                              │
//! │            open(name, options, |db| { ... })                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┼─────────────────────────┐
//!          │            │                         │
//!          ▼            ▼                         ▼
//!   ┌─────────────┐ ┌─────────────┐       ┌─────────────┐
//!   │PathResolver │ │  FileStore  │       │  Document   │
//!   │ (dirs/perm) │ │(lock/commit)│──────►│ (dirty map) │
//!   └─────────────┘ └─────────────┘ bytes └──────┬──────┘
//!                                                │
//!                                                ▼
//!                                         ┌─────────────┐
//!                                         │ KeyAccessor │
//!                                         │ (a.b.c nav) │
//!                                         └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use dotstore::{Session, Config, OpenOptions};
//!
//! let session = Session::new(Config::default())?;
//! session.open("editor", OpenOptions::read_write(), |db| {
//!     db.at("ui.theme").write("dark");
//! })?;
//! let theme = session.open("editor", OpenOptions::read_only(), |db| db.at("ui.theme").read())?;
//! # Ok::<(), dotstore::StoreError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod path;
pub mod file;
pub mod document;
pub mod session;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{StoreError, Result};
pub use config::{Config, Identity, SyncStrategy};
pub use document::{Document, KeyAccessor, Node, Value};
pub use session::{open_database, OpenOptions, Session};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of dotstore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
