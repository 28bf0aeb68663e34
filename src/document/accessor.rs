//! Hierarchical key access
//!
//! A [`KeyAccessor`] is a `(document, prefix)` pair. Navigating never
//! touches the document; reads and writes go to the flat key `prefix`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, StoreError};

use super::Document;

/// Separator between key segments
pub const KEY_SEPARATOR: char = '.';

/// Handle on one dotted key of a [`Document`]
///
/// An accessor for an unset key behaves like "no value" (`read` is `None`,
/// `is_absent` is true) but can still navigate deeper and write, so
///
/// ```
/// # use dotstore::document::Document;
/// let doc = Document::empty();
/// let db = doc.root();
/// assert!(db.child("user").child("name").is_absent());
/// db.child("user").child("name").write("abc");
/// assert_eq!(doc.get("user.name"), Some("abc".into()));
/// ```
#[derive(Debug, Clone)]
pub struct KeyAccessor<'a> {
    document: &'a Document,
    prefix: String,
}

/// Result of [`KeyAccessor::lookup`]
#[derive(Debug, Clone)]
pub enum Node<'a> {
    /// The key holds a value
    Value(Value),

    /// Nothing stored; keep navigating from here
    Branch(KeyAccessor<'a>),
}

impl<'a> KeyAccessor<'a> {
    pub(crate) fn new(document: &'a Document, prefix: String) -> Self {
        Self { document, prefix }
    }

    /// Flat key this accessor reads and writes (empty for the root)
    pub fn key(&self) -> &str {
        &self.prefix
    }

    /// Accessor for `{key}.{segment}`
    pub fn child(&self, segment: &str) -> KeyAccessor<'a> {
        let prefix = if self.prefix.is_empty() {
            segment.to_string()
        } else {
            format!("{}{}{}", self.prefix, KEY_SEPARATOR, segment)
        };
        KeyAccessor::new(self.document, prefix)
    }

    /// Accessor for a dotted path relative to this one: `at("a.b")` is
    /// `child("a").child("b")`
    pub fn at(&self, path: &str) -> KeyAccessor<'a> {
        path.split(KEY_SEPARATOR)
            .fold(self.clone(), |accessor, segment| accessor.child(segment))
    }

    /// The value at `{key}.{segment}` if set, otherwise an accessor for it
    pub fn lookup(&self, segment: &str) -> Node<'a> {
        let child = self.child(segment);
        match child.read() {
            Some(value) => Node::Value(value),
            None => Node::Branch(child),
        }
    }

    pub fn read(&self) -> Option<Value> {
        self.document.get(&self.prefix)
    }

    /// Store `value`; `Value::Null` deletes. Returns the stored value.
    pub fn write(&self, value: impl Into<Value>) -> Value {
        self.document.set(&self.prefix, value)
    }

    /// Remove the value, returning it
    pub fn delete(&self) -> Option<Value> {
        self.document.delete(&self.prefix)
    }

    /// True when nothing is stored under this key
    pub fn is_absent(&self) -> bool {
        self.read().is_none()
    }

    /// Same as [`is_absent`](Self::is_absent): an unset key is empty
    pub fn is_empty(&self) -> bool {
        self.is_absent()
    }

    /// Read and convert to `T`
    pub fn read_as<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        self.read()
            .map(|value| serde_json::from_value(value).map_err(|e| self.convert_error(e)))
            .transpose()
    }

    /// Convert `value` and store it
    pub fn write_as<T: Serialize + ?Sized>(&self, value: &T) -> Result<Value> {
        let value = serde_json::to_value(value).map_err(|e| self.convert_error(e))?;
        Ok(self.write(value))
    }

    fn convert_error(&self, error: serde_json::Error) -> StoreError {
        StoreError::Convert {
            key: self.prefix.clone(),
            message: error.to_string(),
        }
    }
}

impl Node<'_> {
    /// Branches stand for "nothing stored"
    pub fn is_absent(&self) -> bool {
        matches!(self, Node::Branch(_))
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Node::Value(value) => Some(value),
            Node::Branch(_) => None,
        }
    }
}

impl PartialEq<Value> for KeyAccessor<'_> {
    fn eq(&self, other: &Value) -> bool {
        self.read().as_ref() == Some(other)
    }
}
