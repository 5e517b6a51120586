//! Node keys and key resolution.
//!
//! A [`Key`] identifies a node in the graph. Items submitted to the graph are
//! either bare keys (strings or integers) or structured records whose key
//! lives at a configured [`KeyPath`].

use crate::graph::GraphError;
use crate::path::KeyPath;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// Identifies a node in the graph. Integers and strings are distinct keys:
/// `Key::Int(1)` and `Key::Str("1")` never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    Int(i64),
    Str(String),
}

impl Key {
    /// Interpret a value as a bare key. Strings and integral numbers
    /// qualify; everything else returns `None`.
    pub fn from_value(value: &Value) -> Option<Key> {
        match value {
            Value::String(s) => Some(Key::Str(s.clone())),
            Value::Number(n) => n.as_i64().map(Key::Int),
            _ => None,
        }
    }

    /// The value a placeholder node carries for this key.
    pub fn to_value(&self) -> Value {
        match self {
            Key::Int(n) => Value::from(*n),
            Key::Str(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(n) => write!(f, "{n}"),
            Key::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Key {
    fn from(n: i64) -> Self {
        Key::Int(n)
    }
}

impl From<i32> for Key {
    fn from(n: i32) -> Self {
        Key::Int(n.into())
    }
}

impl From<u32> for Key {
    fn from(n: u32) -> Self {
        Key::Int(n.into())
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Str(s)
    }
}

impl From<Key> for Value {
    fn from(key: Key) -> Self {
        match key {
            Key::Int(n) => Value::from(n),
            Key::Str(s) => Value::String(s),
        }
    }
}

impl From<&Key> for Value {
    fn from(key: &Key) -> Self {
        key.to_value()
    }
}

// ---------------------------------------------------------------------------
// Key resolution
// ---------------------------------------------------------------------------

/// Returns true for values that hold fields (objects and arrays). Only these
/// go through the key path; anything else is treated as a bare key.
pub fn is_structured(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

/// Derive the key for a submitted item.
///
/// Without a path the item itself must be a bare key. With a path, structured
/// items are looked up through it and bare keys pass through unchanged, so a
/// single collection can mix raw ids and full records.
pub fn resolve_key(item: &Value, path: Option<&KeyPath>) -> Result<Key, GraphError> {
    if item.is_null() {
        return Err(GraphError::NullOrUndefinedNode);
    }
    let target = match path {
        Some(path) if is_structured(item) => path
            .get(item)
            .ok_or_else(|| GraphError::MissingRequiredPath(path.to_string()))?,
        _ => item,
    };
    Key::from_value(target).ok_or_else(|| GraphError::InvalidKey(target.clone()))
}
