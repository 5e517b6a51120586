//! Toposort Core -- dependency graphs with deterministic, level-grouped
//! topological ordering.
//!
//! Items are added to a [`graph::Graph`] either as bare keys (strings or
//! integers) or as structured records whose key lives at a configured
//! [`path::KeyPath`]. Edges point from a dependency to its dependents. A sort
//! answers "what can run now" level by level, and reports what blocks the
//! rest.
//!
//! # Sorting
//!
//! [`graph::Graph::sort`] runs Kahn's algorithm from the roots in insertion
//! order:
//!
//! 1. **Degrees** -- Count each node's direct predecessors.
//! 2. **Levels** -- Emit roots as level 0, then every node whose last
//!    predecessor was just emitted at the next level.
//! 3. **Cycles** -- If some nodes were never reached, a depth-first walk
//!    enumerates the cycles holding them back.
//! 4. **Duplicates** -- Conflicting values submitted under a used key are
//!    attached to the result; they never alter the graph.
//!
//! ```rust,ignore
//! let graph = Graph::from_entries([(1, 3), (2, 3), (3, 4)], GraphOptions::default())?;
//! let result = graph.sort(SortMode::Group);
//! // [[1, 2], [3], [4]]
//! ```
//!
//! # Key Types
//!
//! - [`graph::Graph`] -- Insertion-ordered node store with duplicate tracking.
//! - [`sort::SortResult`] -- Placed nodes, cycles and duplicates of a sort.
//! - [`adapter::DependencyGraph`] -- Declarative `id -> dependencies` form.
//! - [`key::Key`] -- Integer or string node key.
//! - [`item::Item`] -- A submitted value; records compare by identity.

pub mod adapter;
pub mod cycles;
pub mod graph;
pub mod item;
pub mod key;
pub mod path;
pub mod sort;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use adapter::DependencyGraph;
pub use graph::{DuplicateEntry, Entry, Graph, GraphError, GraphOptions, Operand};
pub use item::Item;
pub use key::Key;
pub use path::KeyPath;
pub use sort::{Cycle, SortMode, SortResult, SortedNodes};
