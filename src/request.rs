//! JSON-describable (algorithm, input) pairs and a family-erased trace.

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::algorithms::graph::{self, Graph, GraphStep, NodeId};
use crate::algorithms::heap::{self, HeapKind, HeapStep};
use crate::algorithms::linked_list::{LinkedListOp, LinkedStep};
use crate::algorithms::list::{ListError, ListOp, ListStep, ListStore};
use crate::algorithms::matrix::{self, Matrix, MatrixOrder, MatrixStep};
use crate::algorithms::search::{self, SearchStep};
use crate::algorithms::tree::{self, BinaryTree, TraversalOrder, TreeStep};
use crate::config::Config;
use crate::trace::tape::{self, TapeHeader, TraceTape};
use crate::trace::{Step, Trace, TraceError};

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("list operation rejected: {0}")]
    Rejected(#[from] ListError),
    #[error("invalid trace: {0}")]
    Trace(#[from] TraceError),
    #[error("unknown step family in tape: {0}")]
    UnknownFamily(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphAlgorithm {
    Bfs,
    Dfs,
    Dijkstra,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum HeapOperation {
    Insert { value: i64 },
    Extract,
    Build,
    Sort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchAlgorithm {
    Linear,
    Binary,
}

/// One algorithm plus the structural input it runs on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum TraceRequest {
    Graph {
        algorithm: GraphAlgorithm,
        graph: Graph,
        start: NodeId,
    },
    Heap {
        operation: HeapOperation,
        array: Vec<i64>,
        /// Falls back to the configured default.
        #[serde(default)]
        kind: Option<HeapKind>,
    },
    Tree {
        order: TraversalOrder,
        /// Level-order listing, `null` for a missing child.
        level_order: Vec<Option<i64>>,
    },
    Matrix {
        order: MatrixOrder,
        matrix: Matrix,
    },
    Search {
        algorithm: SearchAlgorithm,
        array: Vec<i64>,
        target: i64,
    },
    List {
        operation: ListOp,
        values: Vec<i64>,
        /// Falls back to the configured default.
        #[serde(default)]
        capacity: Option<usize>,
    },
    LinkedList {
        operation: LinkedListOp,
        values: Vec<i64>,
    },
}

/// Output of running a request.
#[derive(Debug, Clone)]
pub struct Run {
    pub algorithm: &'static str,
    pub trace: AnyTrace,
    /// Removed, retrieved or replaced element for list edits.
    pub return_value: Option<i64>,
}

impl TraceRequest {
    pub fn family(&self) -> &'static str {
        match self {
            TraceRequest::Graph { .. } => "graph",
            TraceRequest::Heap { .. } => "heap",
            TraceRequest::Tree { .. } => "tree",
            TraceRequest::Matrix { .. } => "matrix",
            TraceRequest::Search { .. } => "search",
            TraceRequest::List { .. } => "list",
            TraceRequest::LinkedList { .. } => "linked_list",
        }
    }

    /// Materialize the trace. List edits that fail validation are returned
    /// as [`RequestError::Rejected`].
    pub fn run(&self, config: &Config) -> Result<Run, RequestError> {
        let run = match self {
            TraceRequest::Graph {
                algorithm,
                graph,
                start,
            } => {
                let (name, trace) = match algorithm {
                    GraphAlgorithm::Bfs => ("bfs", graph::bfs(graph, *start)),
                    GraphAlgorithm::Dfs => ("dfs", graph::dfs(graph, *start)),
                    GraphAlgorithm::Dijkstra => ("dijkstra", graph::dijkstra(graph, *start)),
                };
                Run::new(name, AnyTrace::Graph(trace))
            }
            TraceRequest::Heap {
                operation,
                array,
                kind,
            } => {
                let kind = kind.unwrap_or(config.heap.kind);
                let (name, trace) = match operation {
                    HeapOperation::Insert { value } => ("insert", heap::insert(array, *value, kind)),
                    HeapOperation::Extract => ("extract", heap::extract(array, kind)),
                    HeapOperation::Build => ("build_heap", heap::build_heap(array, kind)),
                    HeapOperation::Sort => ("heap_sort", heap::heap_sort(array, kind)),
                };
                let extracted = trace.last().and_then(|s| s.extracted);
                Run {
                    return_value: extracted,
                    ..Run::new(name, AnyTrace::Heap(trace))
                }
            }
            TraceRequest::Tree { order, level_order } => {
                let tree = BinaryTree::from_level_order(level_order);
                let name = match order {
                    TraversalOrder::InOrder => "in_order",
                    TraversalOrder::PreOrder => "pre_order",
                    TraversalOrder::PostOrder => "post_order",
                    TraversalOrder::LevelOrder => "level_order",
                };
                Run::new(name, AnyTrace::Tree(tree::traverse(&tree, *order)))
            }
            TraceRequest::Matrix { order, matrix } => Run::new(
                order.as_str(),
                AnyTrace::Matrix(matrix::traverse(matrix, *order)),
            ),
            TraceRequest::Search {
                algorithm,
                array,
                target,
            } => {
                let (name, trace) = match algorithm {
                    SearchAlgorithm::Linear => ("linear", search::linear_search(array, *target)),
                    SearchAlgorithm::Binary => ("binary", search::binary_search(array, *target)),
                };
                Run::new(name, AnyTrace::Search(trace))
            }
            TraceRequest::List {
                operation,
                values,
                capacity,
            } => {
                let capacity = capacity.unwrap_or(config.list.capacity);
                let store = ListStore::from_values(values, capacity);
                let result = operation.apply(&store);
                if let Some(error) = result.error {
                    return Err(error.into());
                }
                Run {
                    return_value: result.return_value,
                    ..Run::new(list_op_name(operation), AnyTrace::List(Trace::materialize(result.steps)?))
                }
            }
            TraceRequest::LinkedList { operation, values } => {
                let result = operation.apply(values);
                if let Some(error) = result.error {
                    return Err(error.into());
                }
                Run {
                    return_value: result.return_value,
                    ..Run::new(
                        linked_op_name(operation),
                        AnyTrace::LinkedList(Trace::materialize(result.steps)?),
                    )
                }
            }
        };

        tracing::debug!(
            family = self.family(),
            algorithm = run.algorithm,
            steps = run.trace.len(),
            "Request materialized"
        );
        Ok(run)
    }
}

impl Run {
    fn new(algorithm: &'static str, trace: AnyTrace) -> Self {
        Self {
            algorithm,
            trace,
            return_value: None,
        }
    }
}

fn list_op_name(op: &ListOp) -> &'static str {
    match op {
        ListOp::AddAt { .. } => "add_at",
        ListOp::AddFirst { .. } => "add_first",
        ListOp::AddLast { .. } => "add_last",
        ListOp::Get { .. } => "get",
        ListOp::Set { .. } => "set",
        ListOp::RemoveAt { .. } => "remove_at",
        ListOp::RemoveFirst => "remove_first",
        ListOp::RemoveLast => "remove_last",
    }
}

fn linked_op_name(op: &LinkedListOp) -> &'static str {
    match op {
        LinkedListOp::AddAt { .. } => "add_at",
        LinkedListOp::AddFirst { .. } => "add_first",
        LinkedListOp::AddLast { .. } => "add_last",
        LinkedListOp::Get { .. } => "get",
        LinkedListOp::RemoveAt { .. } => "remove_at",
        LinkedListOp::RemoveFirst => "remove_first",
        LinkedListOp::RemoveLast => "remove_last",
    }
}

/// A trace from any family, for consumers that only need the shared
/// [`Step`] surface.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyTrace {
    Graph(Trace<GraphStep>),
    Heap(Trace<HeapStep>),
    Tree(Trace<TreeStep>),
    Matrix(Trace<MatrixStep>),
    Search(Trace<SearchStep>),
    List(Trace<ListStep>),
    LinkedList(Trace<LinkedStep>),
}

impl AnyTrace {
    pub fn family(&self) -> &'static str {
        match self {
            AnyTrace::Graph(_) => "graph",
            AnyTrace::Heap(_) => "heap",
            AnyTrace::Tree(_) => "tree",
            AnyTrace::Matrix(_) => "matrix",
            AnyTrace::Search(_) => "search",
            AnyTrace::List(_) => "list",
            AnyTrace::LinkedList(_) => "linked_list",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            AnyTrace::Graph(t) => t.len(),
            AnyTrace::Heap(t) => t.len(),
            AnyTrace::Tree(t) => t.len(),
            AnyTrace::Matrix(t) => t.len(),
            AnyTrace::Search(t) => t.len(),
            AnyTrace::List(t) => t.len(),
            AnyTrace::LinkedList(t) => t.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn step(&self, index: usize) -> Option<&dyn Step> {
        match self {
            AnyTrace::Graph(t) => t.get(index).map(|s| s as &dyn Step),
            AnyTrace::Heap(t) => t.get(index).map(|s| s as &dyn Step),
            AnyTrace::Tree(t) => t.get(index).map(|s| s as &dyn Step),
            AnyTrace::Matrix(t) => t.get(index).map(|s| s as &dyn Step),
            AnyTrace::Search(t) => t.get(index).map(|s| s as &dyn Step),
            AnyTrace::List(t) => t.get(index).map(|s| s as &dyn Step),
            AnyTrace::LinkedList(t) => t.get(index).map(|s| s as &dyn Step),
        }
    }

    pub fn steps(&self) -> Vec<&dyn Step> {
        (0..self.len()).filter_map(|i| self.step(i)).collect()
    }

    /// Step payloads as a JSON array.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        match self {
            AnyTrace::Graph(t) => serde_json::to_value(t.steps()),
            AnyTrace::Heap(t) => serde_json::to_value(t.steps()),
            AnyTrace::Tree(t) => serde_json::to_value(t.steps()),
            AnyTrace::Matrix(t) => serde_json::to_value(t.steps()),
            AnyTrace::Search(t) => serde_json::to_value(t.steps()),
            AnyTrace::List(t) => serde_json::to_value(t.steps()),
            AnyTrace::LinkedList(t) => serde_json::to_value(t.steps()),
        }
    }

    /// Write as a JSONL tape to any writer.
    pub fn write_tape<W: io::Write>(&self, algorithm: &str, writer: W) -> io::Result<()> {
        let family = self.family();
        match self {
            AnyTrace::Graph(t) => TraceTape::new(family, algorithm, t.clone()).write_jsonl(writer),
            AnyTrace::Heap(t) => TraceTape::new(family, algorithm, t.clone()).write_jsonl(writer),
            AnyTrace::Tree(t) => TraceTape::new(family, algorithm, t.clone()).write_jsonl(writer),
            AnyTrace::Matrix(t) => TraceTape::new(family, algorithm, t.clone()).write_jsonl(writer),
            AnyTrace::Search(t) => TraceTape::new(family, algorithm, t.clone()).write_jsonl(writer),
            AnyTrace::List(t) => TraceTape::new(family, algorithm, t.clone()).write_jsonl(writer),
            AnyTrace::LinkedList(t) => {
                TraceTape::new(family, algorithm, t.clone()).write_jsonl(writer)
            }
        }
    }

    pub fn write_tape_to_path(&self, algorithm: &str, path: &Path) -> io::Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_tape(algorithm, io::BufWriter::new(file))
    }

    /// Load a tape written by [`write_tape`](Self::write_tape), decoding the
    /// step family named in its header.
    pub fn read_tape(path: &Path) -> Result<(TapeHeader, AnyTrace), RequestError> {
        let header = tape::read_header(path)?;
        let trace = match header.family.as_str() {
            "graph" => AnyTrace::Graph(TraceTape::<GraphStep>::read_jsonl_from_path(path)?.trace),
            "heap" => AnyTrace::Heap(TraceTape::<HeapStep>::read_jsonl_from_path(path)?.trace),
            "tree" => AnyTrace::Tree(TraceTape::<TreeStep>::read_jsonl_from_path(path)?.trace),
            "matrix" => AnyTrace::Matrix(TraceTape::<MatrixStep>::read_jsonl_from_path(path)?.trace),
            "search" => AnyTrace::Search(TraceTape::<SearchStep>::read_jsonl_from_path(path)?.trace),
            "list" => AnyTrace::List(TraceTape::<ListStep>::read_jsonl_from_path(path)?.trace),
            "linked_list" => {
                AnyTrace::LinkedList(TraceTape::<LinkedStep>::read_jsonl_from_path(path)?.trace)
            }
            other => return Err(RequestError::UnknownFamily(other.to_string())),
        };
        Ok((header, trace))
    }
}
