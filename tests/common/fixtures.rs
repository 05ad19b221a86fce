//! Fixed inputs shared across integration tests

use algotrace::algorithms::{BinaryTree, Graph, Matrix};

/// Unsorted search sample; 23 sits at index 4.
pub const SEARCH_SAMPLE: [i64; 11] = [38, 12, 72, 5, 23, 91, 16, 45, 8, 56, 2];

/// Valid max-heap.
pub const MAX_HEAP: [i64; 7] = [50, 30, 40, 10, 20, 35, 15];

/// Undirected, unweighted, with one isolated node.
pub fn campus_graph() -> Graph {
    Graph::from_labels(
        &["A", "B", "C", "D", "E", "F"],
        &[
            ("A", "B", 1),
            ("A", "C", 1),
            ("B", "D", 1),
            ("B", "E", 1),
            ("C", "E", 1),
        ],
        false,
        false,
    )
    .expect("fixture graph is valid")
}

/// Directed, weighted; the cheapest S -> T route detours through B and A.
pub fn road_graph() -> Graph {
    Graph::from_labels(
        &["S", "A", "B", "T"],
        &[
            ("S", "A", 4),
            ("S", "B", 1),
            ("B", "A", 2),
            ("A", "T", 1),
            ("B", "T", 5),
        ],
        true,
        true,
    )
    .expect("fixture graph is valid")
}

/// ```text
///         4
///       /   \
///      2     6
///     / \   / \
///    1   3 5   7
/// ```
pub fn balanced_tree() -> BinaryTree {
    BinaryTree::from_bst_inserts(&[4, 2, 6, 1, 3, 5, 7])
}

pub fn grid(rows: usize, cols: usize) -> Matrix {
    Matrix::sequential(rows, cols)
}
