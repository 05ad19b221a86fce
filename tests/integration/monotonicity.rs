//! Progress never runs backwards
//!
//! Sorted boundaries only shrink, tentative distances only drop, and visited
//! sets and traversal outputs only grow by appending.

use super::common::fixtures::{self, SEARCH_SAMPLE};
use super::common::strategies;
use algotrace::algorithms::graph::{self, Distance, Graph};
use algotrace::algorithms::{heap, matrix, tree, HeapKind, MatrixOrder, TraversalOrder};
use proptest::prelude::*;

fn is_prefix<T: PartialEq>(short: &[T], long: &[T]) -> bool {
    short.len() <= long.len() && long[..short.len()] == *short
}

/// Bellman-Ford over the adjacency lists, for comparison.
fn reference_distances(g: &Graph, start: usize) -> Vec<Option<u64>> {
    let mut dist = vec![None; g.node_count()];
    dist[start] = Some(0);
    for _ in 0..g.node_count() {
        for from in 0..g.node_count() {
            let Some(base) = dist[from] else { continue };
            for &(to, weight) in g.neighbors(from) {
                let candidate = base + u64::from(weight);
                if dist[to].map_or(true, |d| candidate < d) {
                    dist[to] = Some(candidate);
                }
            }
        }
    }
    dist
}

#[test]
fn test_heap_sort_boundary_shrinks_to_zero() {
    let trace = heap::heap_sort(&SEARCH_SAMPLE, HeapKind::Max);
    let boundaries: Vec<usize> = trace.iter().filter_map(|s| s.sorted_boundary).collect();
    assert_eq!(boundaries.first(), Some(&SEARCH_SAMPLE.len()));
    assert_eq!(boundaries.last(), Some(&0));
    assert!(boundaries.windows(2).all(|w| w[0] >= w[1]));

    let mut expected = SEARCH_SAMPLE.to_vec();
    expected.sort_unstable();
    assert_eq!(trace.last().unwrap().array, expected);
}

#[test]
fn test_road_graph_distances_only_drop() {
    let trace = graph::dijkstra(&fixtures::road_graph(), 0);
    let rows: Vec<&Vec<Distance>> = trace.iter().filter_map(|s| s.distances.as_ref()).collect();
    for pair in rows.windows(2) {
        for (before, after) in pair[0].iter().zip(pair[1].iter()) {
            assert!(after <= before, "{before} rose to {after}");
        }
    }
    let last = trace.last().unwrap();
    let finals: Vec<Option<u64>> = last
        .distances
        .as_ref()
        .unwrap()
        .iter()
        .map(|d| d.finite())
        .collect();
    assert_eq!(finals, vec![Some(0), Some(3), Some(1), Some(4)]);
}

#[test]
fn test_traversal_outputs_grow_by_appending() {
    let trace = tree::traverse(&fixtures::balanced_tree(), TraversalOrder::InOrder);
    for pair in trace.steps().windows(2) {
        assert!(is_prefix(&pair[0].output, &pair[1].output));
    }
    assert_eq!(trace.last().unwrap().output, vec![1, 2, 3, 4, 5, 6, 7]);
}

proptest! {
    #[test]
    fn prop_heap_sort_boundary_is_monotone(array in strategies::small_array(), max in any::<bool>()) {
        let kind = if max { HeapKind::Max } else { HeapKind::Min };
        let trace = heap::heap_sort(&array, kind);
        let boundaries: Vec<usize> = trace.iter().filter_map(|s| s.sorted_boundary).collect();
        prop_assert!(boundaries.windows(2).all(|w| w[0] >= w[1]));

        let mut expected = array.clone();
        expected.sort_unstable();
        if !max {
            expected.reverse();
        }
        prop_assert_eq!(&trace.last().unwrap().array, &expected);
    }

    #[test]
    fn prop_dijkstra_distances_never_increase(g in strategies::graph(true), start in 0usize..7) {
        prop_assume!(start < g.node_count());
        let trace = graph::dijkstra(&g, start);
        let rows: Vec<&Vec<Distance>> = trace.iter().filter_map(|s| s.distances.as_ref()).collect();
        for pair in rows.windows(2) {
            for (before, after) in pair[0].iter().zip(pair[1].iter()) {
                prop_assert!(after <= before);
            }
        }
        let finals: Vec<Option<u64>> = rows
            .last()
            .unwrap()
            .iter()
            .map(|d| d.finite())
            .collect();
        prop_assert_eq!(finals, reference_distances(&g, start));
    }

    #[test]
    fn prop_visited_sets_grow_by_appending(g in strategies::graph(false), start in 0usize..7) {
        prop_assume!(start < g.node_count());
        for trace in [graph::bfs(&g, start), graph::dfs(&g, start)] {
            for pair in trace.steps().windows(2) {
                prop_assert!(is_prefix(&pair[0].visited, &pair[1].visited));
            }
            let visited = &trace.last().unwrap().visited;
            let mut unique = visited.clone();
            unique.sort_unstable();
            unique.dedup();
            prop_assert_eq!(unique.len(), visited.len());
            prop_assert_eq!(visited[0], start);
        }
    }

    #[test]
    fn prop_matrix_visits_every_cell_once(m in strategies::matrix()) {
        for order in [MatrixOrder::RowMajor, MatrixOrder::ColumnMajor, MatrixOrder::Diagonal, MatrixOrder::AntiDiagonal, MatrixOrder::Spiral, MatrixOrder::Zigzag] {
            let trace = matrix::traverse(&m, order);
            for pair in trace.steps().windows(2) {
                prop_assert!(is_prefix(&pair[0].visited, &pair[1].visited));
            }
            let mut cells = trace.last().unwrap().visited.clone();
            prop_assert_eq!(cells.len(), m.cell_count());
            cells.sort_unstable();
            cells.dedup();
            prop_assert_eq!(cells.len(), m.cell_count());
        }
    }

    #[test]
    fn prop_in_order_of_bst_is_sorted(t in strategies::bst()) {
        let output = &tree::traverse(&t, TraversalOrder::InOrder).last().unwrap().output.clone();
        prop_assert!(output.windows(2).all(|w| w[0] <= w[1]));
    }
}
