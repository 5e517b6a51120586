//! Submitted items and their identity.
//!
//! Records (objects and arrays) are compared by identity: clones of one
//! [`Item`] are the same record, while two records built separately are
//! different submissions even when their contents match. Bare keys (strings
//! and numbers) are compared by value.

use crate::key::{Key, is_structured};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::ops::Deref;
use std::sync::Arc;

/// A value submitted to the graph. Cloning keeps its identity.
#[derive(Debug, Clone)]
pub struct Item(Arc<Value>);

impl Item {
    /// Wrap a value as a new, distinct item.
    pub fn new(value: impl Into<Value>) -> Self {
        Item(Arc::new(value.into()))
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Arc::unwrap_or_clone(self.0)
    }

    /// Whether `other` is the same submission: the same record, or an equal
    /// bare key.
    pub fn is_same(&self, other: &Item) -> bool {
        if is_structured(&self.0) || is_structured(&other.0) {
            Arc::ptr_eq(&self.0, &other.0)
        } else {
            self.0 == other.0
        }
    }
}

impl Deref for Item {
    type Target = Value;

    fn deref(&self) -> &Value {
        &self.0
    }
}

/// Compares contents. Use [`Item::is_same`] for identity.
impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl From<Value> for Item {
    fn from(value: Value) -> Self {
        Item::new(value)
    }
}

impl From<i64> for Item {
    fn from(n: i64) -> Self {
        Item::new(n)
    }
}

impl From<i32> for Item {
    fn from(n: i32) -> Self {
        Item::new(n)
    }
}

impl From<u32> for Item {
    fn from(n: u32) -> Self {
        Item::new(n)
    }
}

impl From<&str> for Item {
    fn from(s: &str) -> Self {
        Item::new(s)
    }
}

impl From<String> for Item {
    fn from(s: String) -> Self {
        Item::new(s)
    }
}

impl From<Key> for Item {
    fn from(key: Key) -> Self {
        Item::new(key)
    }
}

impl From<&Key> for Item {
    fn from(key: &Key) -> Self {
        Item::new(key)
    }
}

impl Serialize for Item {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Item {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Item::new)
    }
}
