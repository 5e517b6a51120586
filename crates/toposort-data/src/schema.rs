//! Serde structs for graph definition files.
//!
//! One file shape covers both construction forms: an `entries` list (bare
//! items and `[from, to]` pairs) and the declarative `nodes`/`dependencies`
//! maps. Either, or both, may be present.
//!
//! A file cannot express record identity, so records with equal content
//! under the same key are taken to be one record. Repeating a record in
//! several pairs does not make it a duplicate; a record that differs does.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use toposort_core::key::is_structured;
use toposort_core::{DependencyGraph, Entry, Graph, GraphError, GraphOptions, Item, Key, SortMode};

/// A graph definition as written on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphFile {
    /// Key path applied to structured entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Sort mode used by [`crate::sort_file`]; defaults to grouped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<SortMode>,

    /// Node values by explicit id.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub nodes: IndexMap<Key, Value>,

    /// Bare items and `[from, to]` pairs, resolved through `path`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<Entry>,

    /// For each id, the ids that must come before it.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub dependencies: IndexMap<Key, Vec<Key>>,
}

impl GraphFile {
    /// Build the graph: explicit nodes first, then entries, then dependencies.
    pub fn into_graph(self) -> Result<Graph, GraphError> {
        let mut graph = Graph::with_options(GraphOptions { path: self.path });
        let mut records = FileRecords::default();
        for (id, value) in self.nodes {
            let value = records.share(id.clone(), Item::new(value));
            graph.add_node_with_id(id, value)?;
        }
        for entry in self.entries {
            let entry = match entry {
                Entry::Edge(from, to) => {
                    Entry::Edge(records.resolve(&graph, from), records.resolve(&graph, to))
                }
                Entry::Node(item) => Entry::Node(records.resolve(&graph, item)),
            };
            graph.add_entry(entry)?;
        }
        for (dependent, dependencies) in self.dependencies {
            for dependency in dependencies {
                graph.add_dependency(dependent.clone(), dependency)?;
            }
        }
        Ok(graph)
    }

    /// Declarative snapshot of a graph, keeping its key path.
    pub fn from_graph(graph: &Graph) -> Self {
        let DependencyGraph {
            nodes,
            dependencies,
        } = graph.to_dependency_graph();
        Self {
            path: graph.path().map(|p| p.to_string()),
            mode: None,
            nodes,
            entries: Vec::new(),
            dependencies,
        }
    }
}

/// Records seen so far in one file, by key.
#[derive(Default)]
struct FileRecords {
    seen: IndexMap<Key, Vec<Item>>,
}

impl FileRecords {
    /// The item already seen with this content under `key`, or `item` itself.
    fn share(&mut self, key: Key, item: Item) -> Item {
        if !is_structured(&item) {
            return item;
        }
        let bucket = self.seen.entry(key).or_default();
        if let Some(existing) = bucket.iter().find(|seen| **seen == item) {
            return existing.clone();
        }
        bucket.push(item.clone());
        item
    }

    /// Like [`FileRecords::share`], keyed the way `graph` will key the item.
    /// Items that cannot be keyed pass through and fail when added.
    fn resolve(&mut self, graph: &Graph, item: Item) -> Item {
        match graph.key(&item) {
            Ok(key) => self.share(key, item),
            Err(_) => item,
        }
    }
}

impl From<DependencyGraph> for GraphFile {
    fn from(declared: DependencyGraph) -> Self {
        Self {
            nodes: declared.nodes,
            dependencies: declared.dependencies,
            ..Self::default()
        }
    }
}
