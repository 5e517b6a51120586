//! Nested field lookup for key extraction.
//!
//! A [`KeyPath`] is a dot-separated path with optional bracket indices, e.g.
//! `package.name` or `authors[0].email`. Lookups never fail loudly: a missing
//! segment yields `None`, and the caller decides whether that is an error.

use serde_json::Value;
use std::fmt;

/// A parsed nested field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath {
    raw: String,
    segments: Vec<String>,
}

impl KeyPath {
    /// Parse a path. `[n]` becomes its own segment, `\.` escapes a literal
    /// dot inside a segment, and empty segments are dropped.
    pub fn parse(raw: &str) -> Self {
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut chars = raw.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '\\' if chars.peek() == Some(&'.') => {
                    current.push('.');
                    chars.next();
                }
                '.' => flush_segment(&mut segments, &mut current),
                '[' => {
                    flush_segment(&mut segments, &mut current);
                    for inner in chars.by_ref() {
                        if inner == ']' {
                            break;
                        }
                        current.push(inner);
                    }
                    flush_segment(&mut segments, &mut current);
                }
                _ => current.push(c),
            }
        }
        flush_segment(&mut segments, &mut current);

        Self {
            raw: raw.to_string(),
            segments,
        }
    }

    /// The path exactly as it was configured.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed segments, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Look up the nested value. A field literally named like the whole path
    /// wins over descending through its segments. JSON `null` counts as
    /// missing.
    pub fn get<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        if let Some(found) = value.as_object().and_then(|obj| obj.get(&self.raw))
            && !found.is_null()
        {
            return Some(found);
        }

        let mut current = value;
        for segment in &self.segments {
            current = match current {
                Value::Object(obj) => obj.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
            if current.is_null() {
                return None;
            }
        }
        Some(current)
    }

    /// Like [`KeyPath::get`], falling back to `default` when the path is missing.
    pub fn get_or<'a>(&self, value: &'a Value, default: &'a Value) -> &'a Value {
        self.get(value).unwrap_or(default)
    }
}

fn flush_segment(segments: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        segments.push(std::mem::take(current));
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// One-off lookup without keeping the parsed path around.
pub fn deep_get<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    KeyPath::parse(path).get(value)
}

/// One-off lookup with a default.
pub fn deep_get_or<'a>(value: &'a Value, path: &str, default: &'a Value) -> &'a Value {
    deep_get(value, path).unwrap_or(default)
}
