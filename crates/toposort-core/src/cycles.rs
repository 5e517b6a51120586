//! Depth-first cycle enumeration.

use crate::graph::Graph;
use crate::sort::Cycle;
use tracing::debug;

impl Graph {
    /// Enumerate cycles with a depth-first walk from every unvisited root, in
    /// insertion order.
    ///
    /// Each cycle is the full ancestor path from the walk's root to the key
    /// that closed the loop, with that key repeated at the end. A loop
    /// entered from several places is reported once per entry; cycles are
    /// not deduplicated.
    pub fn cycles(&self) -> Vec<Cycle> {
        let count = self.len();
        let mut visited = vec![false; count];
        let mut on_stack = vec![false; count];
        let mut cycles: Vec<Cycle> = Vec::new();

        for root in 0..count {
            if visited[root] {
                continue;
            }

            // Frames are (node, next edge position). The frames double as
            // the ancestor path.
            let mut stack: Vec<(usize, usize)> = Vec::new();
            visited[root] = true;
            on_stack[root] = true;
            stack.push((root, 0));

            while let Some(frame) = stack.last_mut() {
                let (node, cursor) = *frame;
                let Some(target) = self.nodes[node]
                    .edges
                    .get(cursor)
                    .and_then(|key| self.nodes.get_index_of(key))
                else {
                    on_stack[node] = false;
                    stack.pop();
                    continue;
                };
                frame.1 += 1;

                if on_stack[target] {
                    let cycle: Cycle = stack
                        .iter()
                        .map(|&(idx, _)| idx)
                        .chain(std::iter::once(target))
                        .filter_map(|idx| self.nodes.get_index(idx))
                        .map(|(key, _)| key.clone())
                        .collect();
                    cycles.push(cycle);
                } else if !visited[target] {
                    visited[target] = true;
                    on_stack[target] = true;
                    stack.push((target, 0));
                }
            }
        }

        debug!(found = cycles.len(), "cycle enumeration complete");
        cycles
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::Graph;
    use crate::test_utils::*;

    #[test]
    fn acyclic_graph_has_no_cycles() {
        let graph = edge_graph(&LAYERED_EDGES, &[]);
        assert!(graph.cycles().is_empty());
    }

    #[test]
    fn two_node_cycle() {
        let graph = edge_graph(&[(1, 2), (2, 3), (4, 5), (5, 6), (2, 1)], &[]);
        assert_eq!(graph.cycles(), vec![int_keys(&[1, 2, 1])]);
    }

    #[test]
    fn self_loop() {
        let graph = edge_graph(&[(1, 1)], &[]);
        assert_eq!(graph.cycles(), vec![int_keys(&[1, 1])]);
    }

    #[test]
    fn cycle_path_starts_at_root() {
        // 0 -> 1 -> 2 -> 3 -> 1
        let graph = edge_graph(&[(0, 1), (1, 2), (2, 3), (3, 1)], &[]);
        assert_eq!(graph.cycles(), vec![int_keys(&[0, 1, 2, 3, 1])]);
    }

    #[test]
    fn disjoint_cycles_both_reported() {
        let graph = edge_graph(&[(1, 2), (2, 1), (3, 4), (4, 3)], &[]);
        assert_eq!(
            graph.cycles(),
            vec![int_keys(&[1, 2, 1]), int_keys(&[3, 4, 3])]
        );
    }

    #[test]
    fn overlapping_cycles_share_a_node() {
        // 1 -> 2 -> 1 and 1 -> 3 -> 1
        let graph = edge_graph(&[(1, 2), (2, 1), (1, 3), (3, 1)], &[]);
        assert_eq!(
            graph.cycles(),
            vec![int_keys(&[1, 2, 1]), int_keys(&[1, 3, 1])]
        );
    }

    #[test]
    fn visited_nodes_are_not_rewalked() {
        // Both 1 and 2 feed the same tail; the tail is walked once.
        let graph = edge_graph(&[(1, 3), (2, 3), (3, 4), (4, 3)], &[]);
        assert_eq!(graph.cycles(), vec![int_keys(&[1, 3, 4, 3])]);
    }

    #[test]
    fn empty_graph() {
        assert!(Graph::new().cycles().is_empty());
    }
}
