//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::graph::{Graph, GraphOptions};
use crate::item::Item;
use crate::key::Key;
use crate::sort::{SortResult, SortedNodes};
use serde_json::{Value, json};
use std::collections::HashMap;

// ===========================================================================
// Fixtures
// ===========================================================================

/// Eight nodes in five levels:
/// `1,2 -> 3,4 -> 5 -> 6,7 -> 8`.
pub const LAYERED_EDGES: [(i64, i64); 8] = [
    (1, 3),
    (2, 3),
    (2, 4),
    (3, 5),
    (4, 6),
    (5, 6),
    (5, 7),
    (6, 8),
];

/// Same shape as [`LAYERED_EDGES`] with letters.
pub const LAYERED_NAMES: [(&str, &str); 8] = [
    ("A", "C"),
    ("B", "C"),
    ("B", "D"),
    ("C", "E"),
    ("D", "F"),
    ("E", "F"),
    ("E", "G"),
    ("F", "H"),
];

/// A record keyed by its `name` field.
pub fn named(name: &str) -> Value {
    json!({ "name": name })
}

/// Hands out one shared [`named`] record per name, so every mention of a
/// name is the same item.
#[derive(Debug, Default)]
pub struct Records(HashMap<String, Item>);

impl Records {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, name: &str) -> Item {
        self.0
            .entry(name.to_string())
            .or_insert_with(|| Item::new(named(name)))
            .clone()
    }
}

// ===========================================================================
// Graph builders
// ===========================================================================

/// Integer graph: the edge pairs in order, then the isolated nodes.
pub fn edge_graph(pairs: &[(i64, i64)], isolated: &[i64]) -> Graph {
    let mut graph = Graph::new();
    for &(from, to) in pairs {
        graph.add_edge_pair(from, to).unwrap();
    }
    for &node in isolated {
        graph.add_node(node).unwrap();
    }
    graph
}

/// String-keyed counterpart of [`edge_graph`].
pub fn name_graph(pairs: &[(&str, &str)], isolated: &[&str]) -> Graph {
    let mut graph = Graph::new();
    for &(from, to) in pairs {
        graph.add_edge_pair(from, to).unwrap();
    }
    for &node in isolated {
        graph.add_node(node).unwrap();
    }
    graph
}

/// Record graph keyed by `name`: every item is a [`named`] record, shared
/// across all mentions of its name.
pub fn record_graph(pairs: &[(&str, &str)], isolated: &[&str]) -> Graph {
    let mut graph = Graph::with_options(GraphOptions::with_path("name"));
    let mut records = Records::new();
    for &(from, to) in pairs {
        graph
            .add_edge_pair(records.get(from), records.get(to))
            .unwrap();
    }
    for &node in isolated {
        graph.add_node(records.get(node)).unwrap();
    }
    graph
}

/// A single chain `0 -> 1 -> ... -> len-1`.
pub fn chain_graph(len: i64) -> Graph {
    let mut graph = Graph::new();
    graph.add_node(0).unwrap();
    for i in 1..len {
        graph.add_edge_pair(i - 1, i).unwrap();
    }
    graph
}

/// `depth` levels of `width` nodes, each node depending on every node of the
/// previous level.
pub fn layered_graph(width: i64, depth: i64) -> Graph {
    let mut graph = Graph::new();
    for level in 1..depth {
        for to in 0..width {
            for from in 0..width {
                graph
                    .add_edge_pair((level - 1) * width + from, level * width + to)
                    .unwrap();
            }
        }
    }
    graph
}

// ===========================================================================
// Result readers
// ===========================================================================

pub fn int_keys(keys: &[i64]) -> Vec<Key> {
    keys.iter().copied().map(Key::Int).collect()
}

pub fn str_keys(keys: &[&str]) -> Vec<Key> {
    keys.iter().copied().map(Key::from).collect()
}

/// Flat-mode nodes as integers. Panics on grouped output.
pub fn flat_ints(result: &SortResult) -> Vec<i64> {
    match &result.nodes {
        SortedNodes::Flat(nodes) => nodes.iter().map(as_int).collect(),
        SortedNodes::Grouped(_) => panic!("expected flat output"),
    }
}

/// Group-mode nodes as integers. Panics on flat output.
pub fn grouped_ints(result: &SortResult) -> Vec<Vec<i64>> {
    match &result.nodes {
        SortedNodes::Grouped(groups) => groups
            .iter()
            .map(|group| group.iter().map(as_int).collect())
            .collect(),
        SortedNodes::Flat(_) => panic!("expected grouped output"),
    }
}

fn as_int(value: &Value) -> i64 {
    value
        .as_i64()
        .unwrap_or_else(|| panic!("not an integer: {value}"))
}

/// The key of every placed node, in output order, whatever the mode.
pub fn placed_keys(graph: &Graph, result: &SortResult) -> Vec<Key> {
    let values: Vec<&Value> = match &result.nodes {
        SortedNodes::Flat(nodes) => nodes.iter().collect(),
        SortedNodes::Grouped(groups) => groups.iter().flatten().collect(),
    };
    values
        .into_iter()
        .map(|value| graph.key(value).unwrap())
        .collect()
}
