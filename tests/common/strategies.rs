//! proptest strategies for structural inputs

use algotrace::algorithms::{BinaryTree, Graph, Matrix};
use proptest::prelude::*;

pub fn small_array() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-50i64..50, 0..12)
}

pub fn sorted_array() -> impl Strategy<Value = Vec<i64>> {
    small_array().prop_map(|mut v| {
        v.sort_unstable();
        v
    })
}

/// Graph with 1..=7 nodes and arbitrary (possibly duplicate) edges.
pub fn graph(weighted: bool) -> impl Strategy<Value = Graph> {
    (1usize..=7, any::<bool>()).prop_flat_map(move |(nodes, directed)| {
        prop::collection::vec((0..nodes, 0..nodes, 1u32..10), 0..12).prop_map(move |edges| {
            let labels: Vec<String> = (0..nodes).map(|i| format!("N{i}")).collect();
            let label_refs: Vec<&str> = labels.iter().map(String::as_str).collect();
            let edge_refs: Vec<(&str, &str, u32)> = edges
                .iter()
                .map(|&(from, to, w)| (label_refs[from], label_refs[to], w))
                .collect();
            Graph::from_labels(&label_refs, &edge_refs, directed, weighted)
                .expect("edges reference existing labels")
        })
    })
}

pub fn bst() -> impl Strategy<Value = BinaryTree> {
    prop::collection::vec(-30i64..30, 0..10).prop_map(|v| BinaryTree::from_bst_inserts(&v))
}

pub fn matrix() -> impl Strategy<Value = Matrix> {
    (1usize..5, 1usize..5).prop_map(|(rows, cols)| Matrix::sequential(rows, cols))
}
