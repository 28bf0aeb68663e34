//! Document codec
//!
//! Pretty-printed JSON, so files stay easy to edit by hand. The top level
//! is always an object mapping flat dotted keys to values:
//!
//! ```text
//! {
//!   "really.long.flag": true,
//!   "really.long.number": 42
//! }
//! ```

use serde::de::Error as _;
use serde_json::{Map, Value};

/// Serialize a mapping. Output always ends with a newline.
pub fn encode(map: &Map<String, Value>) -> Result<Vec<u8>, serde_json::Error> {
    let mut bytes = serde_json::to_vec_pretty(map)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Deserialize a mapping
///
/// Empty (or whitespace-only) input is an empty mapping. Any top-level
/// value other than an object is rejected.
pub fn decode(bytes: &[u8]) -> Result<Map<String, Value>, serde_json::Error> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    match serde_json::from_slice(bytes)? {
        Value::Object(map) => Ok(map),
        other => Err(serde_json::Error::custom(format!(
            "expected a mapping at the top level, found {}",
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a mapping",
    }
}
