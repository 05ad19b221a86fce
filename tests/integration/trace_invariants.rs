//! Properties every trace must satisfy regardless of family
//!
//! Determinism, a single terminating `complete` step, snapshots that are
//! unaffected by later changes to the input, and random access that agrees
//! with forward iteration.

use super::common::fixtures::{self, MAX_HEAP, SEARCH_SAMPLE};
use super::common::strategies;
use algotrace::algorithms::{graph, heap, matrix, search, tree};
use algotrace::algorithms::{HeapKind, MatrixOrder, TraversalOrder};
use algotrace::{Step, Trace};
use proptest::prelude::*;

fn assert_terminated<S: Step>(trace: &Trace<S>) {
    assert!(!trace.is_empty(), "trace must not be empty");
    let last = trace.last_index();
    for (i, step) in trace.iter().enumerate() {
        assert_eq!(
            step.is_complete(),
            i == last,
            "step {i} ({}) completeness out of place",
            step.kind()
        );
        assert!(!step.message().is_empty(), "step {i} has no narration");
    }
}

fn assert_random_access_agrees<S: Step + PartialEq>(trace: &Trace<S>) {
    let forward: Vec<&S> = trace.iter().collect();
    for i in (0..trace.len()).rev() {
        assert_eq!(&trace[i], forward[i]);
    }
    let shared = trace.clone();
    assert_eq!(shared, *trace);
}

#[test]
fn test_every_family_terminates_once() {
    assert_terminated(&search::linear_search(&SEARCH_SAMPLE, 23));
    assert_terminated(&search::binary_search(&[1, 3, 5, 7], 4));
    assert_terminated(&heap::insert(&MAX_HEAP, 45, HeapKind::Max));
    assert_terminated(&heap::extract(&MAX_HEAP, HeapKind::Max));
    assert_terminated(&heap::heap_sort(&SEARCH_SAMPLE, HeapKind::Min));
    assert_terminated(&graph::bfs(&fixtures::campus_graph(), 0));
    assert_terminated(&graph::dfs(&fixtures::campus_graph(), 0));
    assert_terminated(&graph::dijkstra(&fixtures::road_graph(), 0));
    assert_terminated(&tree::traverse(&fixtures::balanced_tree(), TraversalOrder::PostOrder));
    assert_terminated(&matrix::traverse(&fixtures::grid(3, 4), MatrixOrder::AntiDiagonal));
}

#[test]
fn test_empty_inputs_still_terminate() {
    assert_terminated(&search::linear_search(&[], 1));
    assert_terminated(&search::binary_search(&[], 1));
    assert_terminated(&heap::extract(&[], HeapKind::Max));
    assert_terminated(&heap::heap_sort(&[], HeapKind::Max));
    assert_terminated(&tree::traverse(&tree::BinaryTree::default(), TraversalOrder::InOrder));
    // Out-of-range start vertex.
    assert_terminated(&graph::bfs(&fixtures::campus_graph(), 42));
}

#[test]
fn test_snapshots_survive_input_mutation() {
    let mut input = MAX_HEAP.to_vec();
    let trace = heap::heap_sort(&input, HeapKind::Max);
    let before: Vec<Vec<i64>> = trace.iter().map(|s| s.array.clone()).collect();

    input.iter_mut().for_each(|v| *v = -1);
    input.push(99);

    let after: Vec<Vec<i64>> = trace.iter().map(|s| s.array.clone()).collect();
    assert_eq!(before, after);
    assert_eq!(trace[0].array, MAX_HEAP.to_vec());
}

#[test]
fn test_editing_a_copied_step_leaves_the_trace_alone() {
    let trace = graph::bfs(&fixtures::campus_graph(), 0);
    let mut copy = trace[1].clone();
    copy.visited.clear();
    copy.frontier.push(5);
    assert_ne!(copy, trace[1]);
    assert_eq!(trace[1], graph::bfs(&fixtures::campus_graph(), 0)[1]);
}

#[test]
fn test_random_access_matches_forward_order() {
    assert_random_access_agrees(&graph::dijkstra(&fixtures::road_graph(), 0));
    assert_random_access_agrees(&tree::traverse(&fixtures::balanced_tree(), TraversalOrder::LevelOrder));
    assert_random_access_agrees(&matrix::traverse(&fixtures::grid(4, 4), MatrixOrder::Spiral));
}

#[test]
fn test_traces_are_shareable_across_threads() {
    let trace = graph::dfs(&fixtures::campus_graph(), 0);
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let trace = trace.clone();
            std::thread::spawn(move || trace.iter().map(|s| s.visited.len()).sum::<usize>())
        })
        .collect();
    let expected: usize = trace.iter().map(|s| s.visited.len()).sum();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

proptest! {
    #[test]
    fn prop_search_is_deterministic_and_terminated(array in strategies::small_array(), target in -50i64..50) {
        let first = search::linear_search(&array, target);
        prop_assert_eq!(&first, &search::linear_search(&array, target));
        assert_terminated(&first);
    }

    #[test]
    fn prop_binary_search_agrees_with_contains(array in strategies::sorted_array(), target in -50i64..50) {
        let trace = search::binary_search(&array, target);
        prop_assert_eq!(&trace, &search::binary_search(&array, target));
        assert_terminated(&trace);

        let last = trace.last().unwrap();
        match last.outcome {
            search::SearchOutcome::Found { index } => prop_assert_eq!(array[index], target),
            search::SearchOutcome::NotFound => prop_assert!(!array.contains(&target)),
            other => prop_assert!(false, "unexpected outcome {:?}", other),
        }
        let bound = (usize::BITS - array.len().leading_zeros()) as usize;
        prop_assert!(last.comparisons <= bound);
    }

    #[test]
    fn prop_graph_traces_are_deterministic(g in strategies::graph(true), start in 0usize..7) {
        prop_assert_eq!(graph::bfs(&g, start), graph::bfs(&g, start));
        prop_assert_eq!(graph::dfs(&g, start), graph::dfs(&g, start));
        let dijkstra = graph::dijkstra(&g, start);
        prop_assert_eq!(&dijkstra, &graph::dijkstra(&g, start));
        assert_terminated(&dijkstra);
    }

    #[test]
    fn prop_heap_traces_are_deterministic(array in strategies::small_array(), value in -50i64..50) {
        for kind in [HeapKind::Max, HeapKind::Min] {
            let built = heap::build_heap(&array, kind);
            prop_assert_eq!(&built, &heap::build_heap(&array, kind));
            let heapified = built.last().unwrap().array.clone();
            prop_assert!(heap::is_heap(&heapified, kind));

            let inserted = heap::insert(&heapified, value, kind);
            assert_terminated(&inserted);
            prop_assert!(heap::is_heap(&inserted.last().unwrap().array, kind));
        }
    }

    #[test]
    fn prop_tree_and_matrix_traces_are_deterministic(t in strategies::bst(), m in strategies::matrix()) {
        for order in [TraversalOrder::InOrder, TraversalOrder::PreOrder, TraversalOrder::PostOrder, TraversalOrder::LevelOrder] {
            let trace = tree::traverse(&t, order);
            prop_assert_eq!(&trace, &tree::traverse(&t, order));
            prop_assert_eq!(trace.last().unwrap().output.len(), t.len());
        }
        for order in [MatrixOrder::RowMajor, MatrixOrder::ColumnMajor, MatrixOrder::Diagonal, MatrixOrder::AntiDiagonal, MatrixOrder::Spiral, MatrixOrder::Zigzag] {
            let trace = matrix::traverse(&m, order);
            prop_assert_eq!(&trace, &matrix::traverse(&m, order));
            assert_terminated(&trace);
        }
    }
}
