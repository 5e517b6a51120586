//! Conversion to and from the declarative dependency format.
//!
//! A [`DependencyGraph`] lists, for each id, the ids it depends on. The graph
//! stores the opposite direction (dependency to dependent), so both
//! conversions flip every edge.

use crate::graph::{Graph, GraphError};
use crate::key::Key;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declarative graph: node values by id, and each id's dependencies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependencyGraph {
    pub nodes: IndexMap<Key, Value>,
    /// `dependencies[x]` lists the ids that must come before `x`.
    #[serde(default)]
    pub dependencies: IndexMap<Key, Vec<Key>>,
}

impl Graph {
    /// Build a graph from the declarative form. Nodes are added first, in
    /// declaration order, then every dependency.
    pub fn from_dependency_graph(declared: DependencyGraph) -> Result<Self, GraphError> {
        let mut graph = Graph::new();
        for (id, value) in declared.nodes {
            graph.add_node_with_id(id, value)?;
        }
        for (dependent, dependencies) in declared.dependencies {
            for dependency in dependencies {
                graph.add_dependency(dependent.clone(), dependency)?;
            }
        }
        Ok(graph)
    }

    /// Export to the declarative form. Every key appears in both maps.
    pub fn to_dependency_graph(&self) -> DependencyGraph {
        let nodes: IndexMap<Key, Value> = self
            .nodes
            .iter()
            .map(|(key, node)| (key.clone(), node.value.value().clone()))
            .collect();
        let mut dependencies: IndexMap<Key, Vec<Key>> = self
            .nodes
            .keys()
            .map(|key| (key.clone(), Vec::new()))
            .collect();

        for (from, node) in &self.nodes {
            for to in &node.edges {
                if let Some(list) = dependencies.get_mut(to) {
                    list.push(from.clone());
                }
            }
        }

        DependencyGraph {
            nodes,
            dependencies,
        }
    }
}

impl TryFrom<DependencyGraph> for Graph {
    type Error = GraphError;

    fn try_from(declared: DependencyGraph) -> Result<Self, Self::Error> {
        Graph::from_dependency_graph(declared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::SortMode;
    use serde_json::json;

    fn declared() -> DependencyGraph {
        serde_json::from_value(json!({
            "nodes": {
                "app": { "version": "1.0" },
                "lib": { "version": "0.3" },
                "util": { "version": "0.1" }
            },
            "dependencies": {
                "app": ["lib", "util"],
                "lib": ["util"]
            }
        }))
        .unwrap()
    }

    #[test]
    fn import_flips_edges() {
        let graph = Graph::from_dependency_graph(declared()).unwrap();
        assert_eq!(
            graph.edges(&Key::from("util")).unwrap(),
            [Key::from("app"), Key::from("lib")]
        );
        assert_eq!(graph.edges(&Key::from("lib")).unwrap(), [Key::from("app")]);
        assert!(graph.edges(&Key::from("app")).unwrap().is_empty());
    }

    #[test]
    fn import_sorts_dependencies_first() {
        let graph = Graph::try_from(declared()).unwrap();
        let result = graph.sort(SortMode::Group);
        assert_eq!(
            result.nodes.as_groups().unwrap(),
            [
                vec![json!({ "version": "0.1" })],
                vec![json!({ "version": "0.3" })],
                vec![json!({ "version": "1.0" })],
            ]
        );
    }

    #[test]
    fn undeclared_dependency_becomes_placeholder() {
        let mut declared = declared();
        declared
            .dependencies
            .insert(Key::from("util"), vec![Key::from("core")]);
        let graph = Graph::from_dependency_graph(declared).unwrap();
        assert_eq!(graph.value(&Key::from("core")).unwrap(), &json!("core"));
    }

    #[test]
    fn null_node_value_fails() {
        let mut declared = DependencyGraph::default();
        declared.nodes.insert(Key::Int(1), Value::Null);
        let err = Graph::from_dependency_graph(declared).unwrap_err();
        assert!(matches!(err, GraphError::NullOrUndefined(_)));
    }

    #[test]
    fn export_lists_every_key() {
        let mut graph = Graph::new();
        graph.add_edge_pair(1, 2).unwrap();
        graph.add_node(3).unwrap();

        let exported = graph.to_dependency_graph();
        assert_eq!(exported.nodes.len(), 3);
        assert_eq!(exported.dependencies[&Key::Int(1)], Vec::<Key>::new());
        assert_eq!(exported.dependencies[&Key::Int(2)], vec![Key::Int(1)]);
        assert_eq!(exported.dependencies[&Key::Int(3)], Vec::<Key>::new());
    }

    #[test]
    fn round_trip_preserves_declaration() {
        let original = declared();
        let exported = Graph::from_dependency_graph(original.clone())
            .unwrap()
            .to_dependency_graph();

        assert_eq!(exported.nodes, original.nodes);
        for (id, deps) in &exported.dependencies {
            let mut got = deps.clone();
            let mut want = original.dependencies.get(id).cloned().unwrap_or_default();
            got.sort();
            want.sort();
            assert_eq!(got, want, "dependencies of {id}");
        }
    }
}
