//! Document implementation
//!
//! Flat map from dotted key to value, with a dirty flag.

use std::cell::{Cell, RefCell};

use serde_json::{Map, Value};

use super::{codec, KeyAccessor};

/// Decoded contents of one database
///
/// Uses interior mutability so any number of [`KeyAccessor`]s can share
/// one document. Once closed, every access panics: touching a closed
/// document is a bug in the caller, not a runtime condition.
#[derive(Debug)]
pub struct Document {
    /// `None` once closed
    entries: RefCell<Option<Map<String, Value>>>,

    /// Set by any write or delete since the document was loaded
    dirty: Cell<bool>,
}

impl Document {
    /// Wrap an already-decoded mapping. Starts clean.
    pub fn new(entries: Map<String, Value>) -> Self {
        Self {
            entries: RefCell::new(Some(entries)),
            dirty: Cell::new(false),
        }
    }

    /// An empty, clean document
    pub fn empty() -> Self {
        Self::new(Map::new())
    }

    /// Decode a document from its on-disk bytes
    pub fn decode(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        codec::decode(bytes).map(Self::new)
    }

    /// Encode the full current state (always a total replacement)
    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        self.with_entries(|entries| codec::encode(entries))
    }

    /// Value stored under `key`, if any. Never marks the document dirty.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.with_entries(|entries| entries.get(key).cloned())
    }

    /// Store `value` under `key` and return it
    ///
    /// `Value::Null` is the absent marker: assigning it removes the key.
    /// The value is moved in, so later changes to the caller's data never
    /// reach the document.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Value {
        let value = value.into();
        self.with_entries(|entries| {
            if value.is_null() {
                entries.remove(key);
            } else {
                entries.insert(key.to_string(), value.clone());
            }
        });
        self.dirty.set(true);
        value
    }

    /// Remove `key`, returning what was stored there
    pub fn delete(&self, key: &str) -> Option<Value> {
        let removed = self.get(key);
        self.set(key, Value::Null);
        removed
    }

    /// True if the contents changed since the document was loaded
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Root accessor (empty prefix)
    pub fn root(&self) -> KeyAccessor<'_> {
        KeyAccessor::new(self, String::new())
    }

    /// All stored keys, sorted
    pub fn keys(&self) -> Vec<String> {
        self.with_entries(|entries| entries.keys().cloned().collect())
    }

    pub fn len(&self) -> usize {
        self.with_entries(|entries| entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invalidate the document. Any later access panics.
    pub fn close(&self) {
        self.entries.borrow_mut().take();
    }

    pub fn is_closed(&self) -> bool {
        self.entries.borrow().is_none()
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn with_entries<R>(&self, f: impl FnOnce(&mut Map<String, Value>) -> R) -> R {
        let mut entries = self.entries.borrow_mut();
        match entries.as_mut() {
            Some(entries) => f(entries),
            None => panic!("document used after close"),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::empty()
    }
}
