use crate::item::Item;
use crate::key::{Key, is_structured, resolve_key};
use crate::path::KeyPath;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::{debug, trace};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Which argument of an explicit-id call was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Id,
    Value,
    Dependent,
    Dependency,
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operand::Id => "id",
            Operand::Value => "value",
            Operand::Dependent => "dependent",
            Operand::Dependency => "dependency",
        })
    }
}

/// Errors that can occur while building or querying a graph.
///
/// All of these are caller-input errors raised at the offending call.
/// Conflicting values under one key are not errors; see [`DuplicateEntry`].
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Cannot add null or undefined to graph")]
    NullOrUndefinedNode,
    #[error("Cannot add null or undefined {0} to graph")]
    NullOrUndefined(Operand),
    #[error("Node is missing required path '{0}'")]
    MissingRequiredPath(String),
    #[error("Node with key '{0}' does not exist in graph")]
    NodeNotFound(Key),
    /// Carries the mode as the caller wrote it.
    #[error("Invalid sort mode: {0}. Use SortMode.Group (1) or SortMode.Flat (2)")]
    InvalidSortMode(String),
    #[error("Cannot use {0} as a graph key")]
    InvalidKey(Value),
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Construction options for a [`Graph`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphOptions {
    /// Nested field path used to derive keys from structured items. When
    /// absent, items are used as raw keys.
    #[serde(default)]
    pub path: Option<String>,
}

impl GraphOptions {
    /// Options that extract keys through `path`.
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Core data structures
// ---------------------------------------------------------------------------

/// A stored node: its authoritative value plus outgoing edges.
///
/// An edge from this node to `k` means this node must be ordered before `k`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Node {
    pub(crate) value: Item,
    pub(crate) edges: Vec<Key>,
    /// Created by reference only; the first real value replaces it.
    placeholder: bool,
}

/// Values that were submitted under an already-used key.
///
/// `values[0]` is the authoritative value still held by the graph; the rest
/// are the rejected submissions in arrival order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateEntry {
    pub key: Key,
    pub values: Vec<Value>,
}

/// Outcome of submitting a value for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Insertion {
    Inserted,
    Unchanged,
    Duplicate,
}

/// One element of the array-of-entries construction form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Entry {
    /// `[from, to]`: both ends are added and `from` is ordered before `to`.
    Edge(Item, Item),
    /// A lone node.
    Node(Item),
}

impl From<Value> for Entry {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(mut pair) if pair.len() == 2 => {
                let to = pair.pop().unwrap_or(Value::Null);
                let from = pair.pop().unwrap_or(Value::Null);
                Entry::Edge(from.into(), to.into())
            }
            other => Entry::Node(other.into()),
        }
    }
}

impl From<Item> for Entry {
    fn from(item: Item) -> Self {
        Entry::Node(item)
    }
}

impl<A: Into<Item>, B: Into<Item>> From<(A, B)> for Entry {
    fn from((from, to): (A, B)) -> Self {
        Entry::Edge(from.into(), to.into())
    }
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// A directed graph of keyed items.
///
/// Nodes are kept in insertion order, which makes every ordering the graph
/// produces reproducible. Edges point from a dependency to its dependents.
/// Nothing is ever removed.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    path: Option<KeyPath>,
    pub(crate) nodes: IndexMap<Key, Node>,
    duplicates: IndexMap<Key, Vec<Value>>,
}

impl Graph {
    /// Create an empty graph that uses items as raw keys.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty graph with the given options. An empty path is the
    /// same as no path.
    pub fn with_options(options: GraphOptions) -> Self {
        Self {
            path: options
                .path
                .filter(|p| !p.is_empty())
                .map(|p| KeyPath::parse(&p)),
            ..Self::default()
        }
    }

    /// Build a graph from the array-of-entries form. Stops at the first
    /// failing entry.
    pub fn from_entries<I, E>(entries: I, options: GraphOptions) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = E>,
        E: Into<Entry>,
    {
        let mut graph = Self::with_options(options);
        for entry in entries {
            graph.add_entry(entry.into())?;
        }
        Ok(graph)
    }

    /// The configured key path, if any.
    pub fn path(&self) -> Option<&KeyPath> {
        self.path.as_ref()
    }

    /// Derive the key an item would be stored under.
    pub fn key(&self, item: &Value) -> Result<Key, GraphError> {
        resolve_key(item, self.path.as_ref())
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Add a node, deriving its key from the item.
    ///
    /// Re-adding the same item is a no-op. Any other item under a used key,
    /// including an equal record built separately, is recorded as a
    /// duplicate and leaves the stored node untouched.
    pub fn add_node(&mut self, item: impl Into<Item>) -> Result<Key, GraphError> {
        let item = item.into();
        let key = self.key(&item)?;
        self.submit(key.clone(), item);
        Ok(key)
    }

    /// Add a node under an explicit id. The id is used verbatim; the key
    /// path is not consulted.
    pub fn add_node_with_id(
        &mut self,
        id: impl Into<Value>,
        value: impl Into<Item>,
    ) -> Result<Key, GraphError> {
        let key = explicit_key(id.into(), Operand::Id)?;
        let value = value.into();
        if value.is_null() {
            return Err(GraphError::NullOrUndefined(Operand::Value));
        }
        self.insert_value(key.clone(), value);
        Ok(key)
    }

    /// Declare that `dependent` depends on `dependency`, i.e. `dependency`
    /// must be ordered first. Unknown ids become placeholder nodes.
    pub fn add_dependency(
        &mut self,
        dependent: impl Into<Value>,
        dependency: impl Into<Value>,
    ) -> Result<(), GraphError> {
        let dependent = explicit_key(dependent.into(), Operand::Dependent)?;
        let dependency = explicit_key(dependency.into(), Operand::Dependency)?;
        self.ensure_node(&dependent);
        self.ensure_node(&dependency);
        self.push_edge(&dependency, dependent);
        Ok(())
    }

    /// Add both items and an edge ordering `from` before `to`.
    ///
    /// Both keys are resolved before anything is stored. A duplicate `from`
    /// ends the call before `to` is submitted; a duplicate `to` skips the
    /// edge.
    pub fn add_edge_pair(
        &mut self,
        from: impl Into<Item>,
        to: impl Into<Item>,
    ) -> Result<(), GraphError> {
        let (from, to) = (from.into(), to.into());
        let from_key = self.key(&from)?;
        let to_key = self.key(&to)?;

        if self.submit(from_key.clone(), from) == Insertion::Duplicate {
            return Ok(());
        }
        if self.submit(to_key.clone(), to) == Insertion::Duplicate {
            return Ok(());
        }
        self.push_edge(&from_key, to_key);
        Ok(())
    }

    /// Add one element of the array-of-entries form.
    pub fn add_entry(&mut self, entry: Entry) -> Result<(), GraphError> {
        match entry {
            Entry::Edge(from, to) => self.add_edge_pair(from, to),
            Entry::Node(item) => self.add_node(item).map(|_| ()),
        }
    }

    /// Route a resolved item into the store. With a key path configured, bare
    /// keys only reference a node and never supply its value.
    fn submit(&mut self, key: Key, item: Item) -> Insertion {
        if self.path.is_some() && !is_structured(&item) {
            self.ensure_node(&key);
            return Insertion::Unchanged;
        }
        self.insert_value(key, item)
    }

    fn insert_value(&mut self, key: Key, value: Item) -> Insertion {
        let Some(node) = self.nodes.get_mut(&key) else {
            self.nodes.insert(
                key,
                Node {
                    value,
                    edges: Vec::new(),
                    placeholder: false,
                },
            );
            return Insertion::Inserted;
        };

        if node.placeholder {
            node.value = value;
            node.placeholder = false;
            return Insertion::Inserted;
        }
        if node.value.is_same(&value) {
            return Insertion::Unchanged;
        }

        debug!(key = %key, "recording duplicate value");
        let stored = node.value.value().clone();
        self.duplicates
            .entry(key)
            .or_insert_with(|| vec![stored])
            .push(value.into_value());
        Insertion::Duplicate
    }

    fn ensure_node(&mut self, key: &Key) {
        if !self.nodes.contains_key(key) {
            trace!(key = %key, "creating placeholder node");
            self.nodes.insert(
                key.clone(),
                Node {
                    value: Item::from(key),
                    edges: Vec::new(),
                    placeholder: true,
                },
            );
        }
    }

    /// Append `from -> to`. Both nodes must already exist.
    fn push_edge(&mut self, from: &Key, to: Key) {
        if let Some(node) = self.nodes.get_mut(from) {
            node.edges.push(to);
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Number of nodes, placeholders included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.nodes.contains_key(key)
    }

    /// All keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.nodes.keys()
    }

    /// The authoritative value stored for `key`. Placeholders report their key.
    pub fn value(&self, key: &Key) -> Result<&Value, GraphError> {
        self.node(key).map(|node| node.value.value())
    }

    /// Outgoing edges of `key` (its dependents), in insertion order.
    pub fn edges(&self, key: &Key) -> Result<&[Key], GraphError> {
        self.node(key).map(|node| node.edges.as_slice())
    }

    fn node(&self, key: &Key) -> Result<&Node, GraphError> {
        self.nodes
            .get(key)
            .ok_or_else(|| GraphError::NodeNotFound(key.clone()))
    }

    /// Every conflicting submission recorded so far, in order of first conflict.
    pub fn duplicates(&self) -> Vec<DuplicateEntry> {
        self.duplicates
            .iter()
            .map(|(key, values)| DuplicateEntry {
                key: key.clone(),
                values: values.clone(),
            })
            .collect()
    }

    /// In-degree of every node: the number of direct predecessors.
    pub fn degrees(&self) -> IndexMap<Key, usize> {
        let counts = self.in_degrees();
        self.nodes.keys().cloned().zip(counts).collect()
    }

    /// In-degrees indexed by store position.
    pub(crate) fn in_degrees(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.nodes.len()];
        for node in self.nodes.values() {
            for target in &node.edges {
                if let Some(idx) = self.nodes.get_index_of(target) {
                    counts[idx] += 1;
                }
            }
        }
        counts
    }

    /// Store positions of the targets of the node at `idx`, in edge order.
    pub(crate) fn edge_targets(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.nodes[idx]
            .edges
            .iter()
            .filter_map(|target| self.nodes.get_index_of(target))
    }
}

/// Convert an explicit id to a key. Ids never go through the key path.
fn explicit_key(id: Value, operand: Operand) -> Result<Key, GraphError> {
    if id.is_null() {
        return Err(GraphError::NullOrUndefined(operand));
    }
    Key::from_value(&id).ok_or(GraphError::InvalidKey(id))
}
