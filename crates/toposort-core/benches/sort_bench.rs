//! Criterion benchmarks for graph sorting.
//!
//! Three benchmark groups:
//! - `layered`: dense levels, every node depending on the whole previous level
//! - `chain`: one long dependency chain
//! - `cyclic`: a chain closed into a loop, exercising cycle enumeration

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use toposort_core::SortMode;
use toposort_core::test_utils::*;

fn bench_layered(c: &mut Criterion) {
    let graph = layered_graph(50, 20);
    let mut group = c.benchmark_group("layered");
    group.bench_function("group_1000_nodes", |b| {
        b.iter(|| black_box(graph.sort(SortMode::Group)))
    });
    group.bench_function("flat_1000_nodes", |b| {
        b.iter(|| black_box(graph.sort(SortMode::Flat)))
    });
    group.finish();
}

fn bench_chain(c: &mut Criterion) {
    let graph = chain_graph(10_000);
    c.bench_function("chain_10000_nodes", |b| {
        b.iter(|| black_box(graph.sort(SortMode::Flat)))
    });
}

fn bench_cyclic(c: &mut Criterion) {
    let mut graph = chain_graph(10_000);
    graph.add_edge_pair(9_999, 0).unwrap();
    c.bench_function("cyclic_10000_nodes", |b| {
        b.iter(|| black_box(graph.sort(SortMode::Flat)))
    });
}

criterion_group!(benches, bench_layered, bench_chain, bench_cyclic);
criterion_main!(benches);
