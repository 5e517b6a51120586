//! String-keyed scenarios, mirroring the integer ones with letters.

use serde_json::{Value, json};
use toposort_core::test_utils::*;
use toposort_core::*;

fn strs(values: &[&str]) -> Vec<Value> {
    values.iter().map(|v| json!(v)).collect()
}

#[test]
fn flat_no_cycles() {
    let graph = name_graph(&LAYERED_NAMES, &[]);
    let result = graph.sort(SortMode::Flat);
    assert_eq!(
        result.nodes.as_flat().unwrap(),
        strs(&["A", "B", "C", "D", "E", "F", "G", "H"])
    );
    assert!(result.cycles.is_empty());
}

#[test]
fn flat_no_cycles_with_isolated_node() {
    let graph = name_graph(&[("A", "B"), ("B", "C"), ("D", "E"), ("E", "F")], &["H"]);
    let result = graph.sort(SortMode::Flat);
    assert_eq!(
        result.nodes.as_flat().unwrap(),
        strs(&["A", "D", "H", "B", "E", "C", "F"])
    );
}

#[test]
fn flat_with_cycles() {
    let graph = name_graph(
        &[("A", "B"), ("B", "C"), ("D", "E"), ("E", "F"), ("B", "A")],
        &[],
    );
    let result = graph.sort(SortMode::Flat);
    assert_eq!(result.nodes.as_flat().unwrap(), strs(&["D", "E", "F"]));
    assert_eq!(result.cycles, vec![str_keys(&["A", "B", "A"])]);
}

#[test]
fn group_no_cycles() {
    let graph = name_graph(&LAYERED_NAMES, &[]);
    let result = graph.sort(SortMode::Group);
    assert_eq!(
        result.nodes.as_groups().unwrap(),
        [
            strs(&["A", "B"]),
            strs(&["C", "D"]),
            strs(&["E"]),
            strs(&["F", "G"]),
            strs(&["H"]),
        ]
    );
}

#[test]
fn group_no_cycles_with_isolated_node() {
    let graph = name_graph(&[("A", "B"), ("B", "C"), ("D", "E"), ("E", "F")], &["G"]);
    let result = graph.sort(SortMode::Group);
    assert_eq!(
        result.nodes.as_groups().unwrap(),
        [strs(&["A", "D", "G"]), strs(&["B", "E"]), strs(&["C", "F"])]
    );
}

#[test]
fn group_with_cycles() {
    let graph = name_graph(
        &[("A", "B"), ("B", "C"), ("D", "E"), ("E", "F"), ("B", "A")],
        &[],
    );
    let result = graph.sort(SortMode::Group);
    assert_eq!(
        result.nodes.as_groups().unwrap(),
        [strs(&["D"]), strs(&["E"]), strs(&["F"])]
    );
    assert_eq!(result.cycles, vec![str_keys(&["A", "B", "A"])]);
}
