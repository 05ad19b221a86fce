//! JSON requests through to saved and reloaded tapes

use super::common::fixtures::SEARCH_SAMPLE;
use algotrace::algorithms::graph::{self, GraphStepKind};
use algotrace::algorithms::heap::HeapStepKind;
use algotrace::algorithms::ListError;
use algotrace::trace::tape;
use algotrace::{AnyTrace, Config, RequestError, TraceRequest};
use serde_json::json;
use tempfile::TempDir;

fn request(value: serde_json::Value) -> TraceRequest {
    serde_json::from_value(value).expect("request should parse")
}

fn every_family() -> Vec<TraceRequest> {
    vec![
        request(json!({
            "family": "graph",
            "algorithm": "dijkstra",
            "start": 0,
            "graph": {
                "nodes": [
                    {"label": "S", "x": 0.0, "y": 0.0},
                    {"label": "A", "x": 1.0, "y": 0.0},
                    {"label": "B", "x": 0.0, "y": 1.0}
                ],
                "edges": [{"from": 0, "to": 1, "weight": 5}, {"from": 0, "to": 2, "weight": 1}, {"from": 2, "to": 1, "weight": 1}],
                "directed": true,
                "weighted": true
            }
        })),
        request(json!({"family": "heap", "operation": {"op": "insert", "value": 45}, "array": [50, 30, 40, 10, 20, 35, 15]})),
        request(json!({"family": "tree", "order": "pre-order", "level_order": [4, 2, 6, null, 3]})),
        request(json!({"family": "matrix", "order": "spiral", "matrix": [[1, 2, 3], [4, 5, 6], [7, 8, 9]]})),
        request(json!({"family": "search", "algorithm": "binary", "array": [1, 3, 5, 7, 9, 11, 13, 15], "target": 7})),
        request(json!({"family": "list", "operation": {"op": "add_at", "index": 1, "value": 9}, "values": [1, 2, 3], "capacity": 3})),
        request(json!({"family": "linked_list", "operation": {"op": "remove_last"}, "values": [4, 5, 6]})),
    ]
}

#[test]
fn test_every_family_saves_and_replays() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = Config::default();

    for (i, req) in every_family().into_iter().enumerate() {
        let run = req.run(&config).expect("request should run");
        assert_eq!(run.trace.family(), req.family());
        assert!(run.trace.step(run.trace.len() - 1).unwrap().is_complete());

        let path = dir.path().join(format!("{i}.jsonl"));
        run.trace.write_tape_to_path(run.algorithm, &path).unwrap();

        let header = tape::read_header(&path).unwrap();
        assert_eq!(header.family, req.family());
        assert_eq!(header.algorithm, run.algorithm);

        let (_, replayed) = AnyTrace::read_tape(&path).unwrap();
        assert_eq!(replayed, run.trace, "{} tape should replay identically", req.family());
    }
}

#[test]
fn test_linear_search_scenario() {
    let run = request(json!({
        "family": "search",
        "algorithm": "linear",
        "array": SEARCH_SAMPLE,
        "target": 23
    }))
    .run(&Config::default())
    .unwrap();

    let AnyTrace::Search(trace) = run.trace else {
        panic!("expected a search trace");
    };
    let last = trace.last().unwrap();
    assert_eq!(last.comparisons, 5);
    assert_eq!(last.index, Some(4));
}

#[test]
fn test_heap_insert_scenario_ends_against_root() {
    let run = request(json!({
        "family": "heap",
        "operation": {"op": "insert", "value": 45},
        "array": [50, 30, 40, 10, 20, 35, 15],
        "kind": "max"
    }))
    .run(&Config::default())
    .unwrap();

    let AnyTrace::Heap(trace) = run.trace else {
        panic!("expected a heap trace");
    };
    let last_compare = trace
        .iter()
        .filter(|s| s.kind == HeapStepKind::Compare)
        .last()
        .unwrap();
    assert!(last_compare.compared.contains(&0));
    let last_swap = trace.iter().rposition(|s| s.kind == HeapStepKind::Swap).unwrap();
    let last_compare_at = trace.iter().rposition(|s| s.kind == HeapStepKind::Compare).unwrap();
    assert!(last_swap < last_compare_at, "no swap after comparing with 50");
    assert_eq!(trace.last().unwrap().array, vec![50, 45, 40, 30, 20, 35, 15, 10]);
}

#[test]
fn test_dijkstra_request_recovers_path() {
    let run = every_family().remove(0).run(&Config::default()).unwrap();
    let AnyTrace::Graph(trace) = run.trace else {
        panic!("expected a graph trace");
    };
    let last = trace.last().unwrap();
    assert_eq!(last.kind, GraphStepKind::Complete);
    let preds = last.predecessors.as_ref().unwrap();
    assert_eq!(graph::shortest_path(preds, 0, 1), Some(vec![0, 2, 1]));
}

#[test]
fn test_configured_list_capacity_applies() {
    let mut config = Config::default();
    config.list.capacity = 2;
    let run = request(json!({
        "family": "list",
        "operation": {"op": "add_last", "value": 3},
        "values": [1, 2]
    }))
    .run(&config)
    .unwrap();

    let AnyTrace::List(trace) = run.trace else {
        panic!("expected a list trace");
    };
    let final_store = &trace.last().unwrap().store;
    assert_eq!(final_store.capacity(), 4);
    assert_eq!(final_store.values(), vec![1, 2, 3]);
}

#[test]
fn test_empty_linked_list_removal_is_rejected() {
    let err = request(json!({"family": "linked_list", "operation": {"op": "remove_first"}, "values": []}))
        .run(&Config::default())
        .unwrap_err();
    assert!(matches!(err, RequestError::Rejected(ListError::Empty)));
}

#[test]
fn test_unknown_family_is_a_parse_error() {
    let result = serde_json::from_value::<TraceRequest>(json!({"family": "trie", "words": []}));
    assert!(result.is_err());
}
