//! Level-by-level topological sort (Kahn's algorithm).

use crate::graph::{DuplicateEntry, Graph, GraphError};
use crate::key::Key;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;
use std::str::FromStr;
use tracing::{debug, warn};

/// A loop in the graph: a DFS path that closes on a key already on the stack.
/// The closing key appears twice, e.g. `[1, 2, 1]`.
pub type Cycle = Vec<Key>;

/// Shape of the sorted output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// One list per level; every node's predecessors sit in earlier levels.
    #[default]
    Group = 1,
    /// A single list in dependency order.
    Flat = 2,
}

impl TryFrom<i64> for SortMode {
    type Error = GraphError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(SortMode::Group),
            2 => Ok(SortMode::Flat),
            other => Err(GraphError::InvalidSortMode(other.to_string())),
        }
    }
}

impl FromStr for SortMode {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mode = s.trim();
        match mode.to_ascii_lowercase().as_str() {
            "group" | "1" => Ok(SortMode::Group),
            "flat" | "2" => Ok(SortMode::Flat),
            _ => Err(GraphError::InvalidSortMode(mode.to_string())),
        }
    }
}

/// Sorted node values, flat or grouped by level.
///
/// Deserializing is ambiguous for a flat list whose values are all arrays;
/// such input reads back as `Grouped`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SortedNodes {
    Grouped(Vec<Vec<Value>>),
    Flat(Vec<Value>),
}

impl SortedNodes {
    pub fn as_flat(&self) -> Option<&[Value]> {
        match self {
            SortedNodes::Flat(nodes) => Some(nodes),
            SortedNodes::Grouped(_) => None,
        }
    }

    pub fn as_groups(&self) -> Option<&[Vec<Value>]> {
        match self {
            SortedNodes::Grouped(groups) => Some(groups),
            SortedNodes::Flat(_) => None,
        }
    }

    /// Number of node values, across all groups.
    pub fn len(&self) -> usize {
        match self {
            SortedNodes::Flat(nodes) => nodes.len(),
            SortedNodes::Grouped(groups) => groups.iter().map(Vec::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything a sort reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortResult {
    /// Values of every node that could be placed.
    pub nodes: SortedNodes,
    /// Cycles found among the nodes that could not be placed. Empty when
    /// every node was placed.
    pub cycles: Vec<Cycle>,
    /// Conflicting values submitted under already-used keys.
    pub duplicates: Vec<DuplicateEntry>,
}

impl Graph {
    /// Order the graph so every node follows its dependencies.
    ///
    /// Roots are taken in insertion order; within a level, nodes appear in the
    /// order their last dependency was placed. Nodes on or behind a cycle are
    /// left out of `nodes` and the cycles are reported instead.
    pub fn sort(&self, mode: SortMode) -> SortResult {
        let total = self.len();
        let mut degrees = self.in_degrees();

        // Seed with every root at level 0.
        let mut queue: VecDeque<(usize, usize)> = degrees
            .iter()
            .enumerate()
            .filter(|&(_, &deg)| deg == 0)
            .map(|(idx, _)| (idx, 0))
            .collect();

        let mut groups: Vec<Vec<Value>> = Vec::new();
        let mut current: Vec<Value> = Vec::new();
        let mut level = 0usize;
        let mut processed = 0usize;

        while let Some((idx, node_level)) = queue.pop_front() {
            if node_level > level {
                groups.push(std::mem::take(&mut current));
                level = node_level;
            }
            current.push(self.nodes[idx].value.value().clone());
            processed += 1;

            for target in self.edge_targets(idx) {
                degrees[target] -= 1;
                if degrees[target] == 0 {
                    queue.push_back((target, node_level + 1));
                }
            }
        }
        if !current.is_empty() {
            groups.push(current);
        }

        let cycles = if processed == total {
            Vec::new()
        } else {
            warn!(processed, total, "sort stalled, enumerating cycles");
            self.cycles()
        };

        debug!(?mode, processed, total, levels = groups.len(), "sort complete");

        let nodes = match mode {
            SortMode::Group => SortedNodes::Grouped(groups),
            SortMode::Flat => SortedNodes::Flat(groups.into_iter().flatten().collect()),
        };

        SortResult {
            nodes,
            cycles,
            duplicates: self.duplicates(),
        }
    }

    /// Sort using the numeric mode code (1 = group, 2 = flat).
    pub fn sort_code(&self, code: i64) -> Result<SortResult, GraphError> {
        Ok(self.sort(SortMode::try_from(code)?))
    }
}
