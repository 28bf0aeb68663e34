//! Tests for KeyAccessor
//!
//! These tests verify:
//! - Reading simple and nested keys
//! - Writing and inserting through navigation
//! - Unset keys behave as absent without mutating the document
//! - Typed reads and writes

use std::collections::HashMap;

use dotstore::document::{Document, Node, Value};
use dotstore::StoreError;
use serde::{Deserialize, Serialize};
use serde_json::json;

// =============================================================================
// Helper Functions
// =============================================================================

fn fixture() -> Document {
    Document::decode(br#"{"variable": "value", "deeper.variable": "deeper value"}"#).unwrap()
}

// =============================================================================
// Navigation Tests
// =============================================================================

#[test]
fn test_root_has_empty_key() {
    let doc = fixture();

    assert_eq!(doc.root().key(), "");
}

#[test]
fn test_child_builds_dotted_key() {
    let doc = fixture();
    let root = doc.root();

    assert_eq!(root.child("a").key(), "a");
    assert_eq!(root.child("a").child("b").child("c").key(), "a.b.c");
    assert_eq!(root.at("a.b.c").key(), "a.b.c");
    assert_eq!(root.child("a").at("b.c").key(), "a.b.c");
}

#[test]
fn test_navigation_does_not_mutate() {
    let doc = fixture();

    let deep = doc.root().child("none").child("none");
    assert!(deep.is_absent());

    assert!(!doc.is_dirty());
    assert_eq!(doc.len(), 2);
}

// =============================================================================
// Read Tests
// =============================================================================

#[test]
fn test_reads_simple_key() {
    let doc = fixture();

    assert_eq!(doc.root().child("variable").read(), Some(json!("value")));
}

#[test]
fn test_reads_nested_key() {
    let doc = fixture();

    assert_eq!(doc.root().child("deeper").child("variable").read(), Some(json!("deeper value")));
}

#[test]
fn test_missing_key_is_absent() {
    let doc = fixture();
    let none = doc.root().child("none");

    assert_eq!(none.read(), None);
    assert!(none.is_absent());
    assert!(none.is_empty());
}

#[test]
fn test_missing_nested_key_is_absent() {
    let doc = fixture();

    assert!(doc.root().child("none").child("none").is_absent());
}

#[test]
fn test_accessor_compares_to_value() {
    let doc = fixture();

    assert!(doc.root().child("variable") == json!("value"));
    assert!(doc.root().child("none") != json!("value"));
}

// =============================================================================
// Write Tests
// =============================================================================

#[test]
fn test_changes_simple_key() {
    let doc = fixture();
    let db = doc.root();

    db.child("variable").write("new value");

    assert_eq!(db.child("variable").read(), Some(json!("new value")));
}

#[test]
fn test_changes_nested_key() {
    let doc = fixture();
    let db = doc.root();

    db.child("deeper").child("variable").write("new deeper value");

    assert_eq!(db.child("deeper").child("variable").read(), Some(json!("new deeper value")));
}

#[test]
fn test_inserts_simple_key() {
    let doc = fixture();
    let db = doc.root();

    assert!(db.child("new_key").is_absent());
    db.child("new_key").write("new value");

    assert_eq!(db.child("new_key").read(), Some(json!("new value")));
}

#[test]
fn test_inserts_nested_key() {
    let doc = fixture();
    let db = doc.root();

    assert!(db.child("newer").child("new_key").is_absent());
    db.child("newer").child("new_key").write("new deep value");

    assert_eq!(db.child("newer").child("new_key").read(), Some(json!("new deep value")));
    assert_eq!(doc.get("newer.new_key"), Some(json!("new deep value")));
}

#[test]
fn test_inserts_nested_key_off_existing_prefix() {
    let doc = fixture();
    let deeper = doc.root().child("deeper");

    assert!(deeper.child("new_key").is_absent());
    deeper.child("new_key").write("new mixed value");

    assert_eq!(deeper.child("new_key").read(), Some(json!("new mixed value")));
    assert_eq!(deeper.child("variable").read(), Some(json!("deeper value")));
}

#[test]
fn test_write_returns_value() {
    let doc = fixture();

    assert_eq!(doc.root().child("n").write(41), json!(41));
}

#[test]
fn test_write_null_deletes() {
    let doc = fixture();
    let variable = doc.root().child("variable");

    variable.write(Value::Null);

    assert!(variable.is_absent());
    assert!(doc.is_dirty());
}

#[test]
fn test_delete_returns_previous() {
    let doc = fixture();

    assert_eq!(doc.root().child("variable").delete(), Some(json!("value")));
    assert!(doc.root().child("variable").is_absent());
}

#[test]
fn test_read_keeps_document_clean() {
    let doc = fixture();

    doc.root().child("variable").read();
    doc.root().child("deeper").child("variable").read();

    assert!(!doc.is_dirty());
}

#[test]
fn test_write_marks_document_dirty() {
    let doc = fixture();

    doc.root().child("variable").write("value");

    assert!(doc.is_dirty());
}

// =============================================================================
// Lookup Tests
// =============================================================================

#[test]
fn test_lookup_existing_returns_value() {
    let doc = fixture();

    match doc.root().lookup("variable") {
        Node::Value(value) => assert_eq!(value, json!("value")),
        Node::Branch(_) => panic!("expected a value"),
    }
}

#[test]
fn test_lookup_missing_returns_branch() {
    let doc = fixture();

    let node = doc.root().lookup("deeper");
    assert!(node.is_absent());
    assert_eq!(node.value(), None);

    match node {
        Node::Branch(branch) => {
            assert_eq!(branch.key(), "deeper");
            assert_eq!(branch.child("variable").read(), Some(json!("deeper value")));
        }
        Node::Value(_) => panic!("expected a branch"),
    }
}

// =============================================================================
// Typed Access Tests
// =============================================================================

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Window {
    width: u32,
    height: u32,
}

#[test]
fn test_typed_round_trip() {
    let doc = Document::empty();
    let window = doc.root().at("ui.window");

    window.write_as(&Window { width: 800, height: 600 }).unwrap();

    assert_eq!(window.read_as::<Window>().unwrap(), Some(Window { width: 800, height: 600 }));
    assert_eq!(doc.root().at("ui.window").read(), Some(json!({"width": 800, "height": 600})));
}

#[test]
fn test_typed_read_missing_is_none() {
    let doc = Document::empty();

    assert_eq!(doc.root().child("missing").read_as::<u32>().unwrap(), None);
}

#[test]
fn test_typed_read_wrong_type_is_convert_error() {
    let doc = fixture();

    let err = doc.root().child("variable").read_as::<u32>().unwrap_err();

    assert!(matches!(err, StoreError::Convert { ref key, .. } if key == "variable"));
    assert!(err.to_string().starts_with("cannot convert value at key \"variable\""));
}

#[test]
fn test_typed_write_unrepresentable_is_convert_error() {
    let doc = Document::empty();
    let mut grid = HashMap::new();
    grid.insert((0u8, 0u8), 1u8);

    // JSON object keys must be strings
    let err = doc.root().at("ui.grid").write_as(&grid).unwrap_err();

    assert!(matches!(err, StoreError::Convert { ref key, .. } if key == "ui.grid"));
    assert!(!doc.is_dirty());
}
