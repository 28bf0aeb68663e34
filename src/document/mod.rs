//! Document Module
//!
//! In-memory view of one decoded database.
//!
//! ## Responsibilities
//! - Flat get/set/delete by dotted key
//! - Dirty tracking (reads keep it clean, writes and deletes dirty it)
//! - Hierarchical navigation through [`KeyAccessor`]
//! - Encoding to and from the on-disk format
//!
//! ## Key Model
//! ```text
//!   root ──child("really")──► "really" ──child("long")──► "really.long"
//!                                                             │
//!                                              child("flag")  ▼
//!                                                   "really.long.flag" = true
//! ```
//! Only the leaf is stored; intermediate prefixes exist only as accessors.

pub mod codec;
mod accessor;
mod table;

pub use accessor::{KeyAccessor, Node, KEY_SEPARATOR};
pub use table::Document;

/// Values stored in a document
pub use serde_json::Value;
