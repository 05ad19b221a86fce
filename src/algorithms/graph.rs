//! Graph search: breadth-first, depth-first and Dijkstra.
//!
//! Every step carries a full copy of the per-node state, the auxiliary
//! structure (queue, stack or priority list) and the visit order so far.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::trace::{Recorder, Step, Trace};

pub type NodeId = usize;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("edge {from} -> {to} references unknown node (graph has {nodes} nodes)")]
    UnknownNode {
        from: NodeId,
        to: NodeId,
        nodes: usize,
    },
    #[error("unknown node label: {0}")]
    UnknownLabel(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub label: String,
    pub x: f64,
    pub y: f64,
}

fn default_weight() -> u32 {
    1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    #[serde(default = "default_weight")]
    pub weight: u32,
}

/// Fixed node set plus edges. Undirected edges are traversable both ways.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GraphSpec", into = "GraphSpec")]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    directed: bool,
    weighted: bool,
    /// Outgoing `(neighbor, weight)` pairs per node, in edge order.
    adjacency: Vec<Vec<(NodeId, u32)>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GraphSpec {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    #[serde(default)]
    directed: bool,
    #[serde(default)]
    weighted: bool,
}

impl TryFrom<GraphSpec> for Graph {
    type Error = GraphError;

    fn try_from(spec: GraphSpec) -> Result<Self, Self::Error> {
        Graph::new(spec.nodes, spec.edges, spec.directed, spec.weighted)
    }
}

impl From<Graph> for GraphSpec {
    fn from(graph: Graph) -> Self {
        Self {
            nodes: graph.nodes,
            edges: graph.edges,
            directed: graph.directed,
            weighted: graph.weighted,
        }
    }
}

impl Graph {
    pub fn new(
        nodes: Vec<Node>,
        edges: Vec<Edge>,
        directed: bool,
        weighted: bool,
    ) -> Result<Self, GraphError> {
        let mut adjacency = vec![Vec::new(); nodes.len()];
        for edge in &edges {
            if edge.from >= nodes.len() || edge.to >= nodes.len() {
                return Err(GraphError::UnknownNode {
                    from: edge.from,
                    to: edge.to,
                    nodes: nodes.len(),
                });
            }
            let weight = if weighted { edge.weight } else { 1 };
            adjacency[edge.from].push((edge.to, weight));
            if !directed {
                adjacency[edge.to].push((edge.from, weight));
            }
        }
        Ok(Self {
            nodes,
            edges,
            directed,
            weighted,
            adjacency,
        })
    }

    /// Build a graph from labels and `(from, to, weight)` triples, laying the
    /// nodes out on a circle.
    pub fn from_labels(
        labels: &[&str],
        edges: &[(&str, &str, u32)],
        directed: bool,
        weighted: bool,
    ) -> Result<Self, GraphError> {
        let count = labels.len().max(1) as f64;
        let nodes = labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let angle = std::f64::consts::TAU * i as f64 / count;
                Node {
                    label: (*label).to_string(),
                    x: 200.0 + 150.0 * angle.cos(),
                    y: 200.0 + 150.0 * angle.sin(),
                }
            })
            .collect();
        let index_of = |label: &str| {
            labels
                .iter()
                .position(|l| *l == label)
                .ok_or_else(|| GraphError::UnknownLabel(label.to_string()))
        };
        let edges = edges
            .iter()
            .map(|&(from, to, weight)| {
                Ok(Edge {
                    from: index_of(from)?,
                    to: index_of(to)?,
                    weight,
                })
            })
            .collect::<Result<Vec<_>, GraphError>>()?;
        Self::new(nodes, edges, directed, weighted)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn is_weighted(&self) -> bool {
        self.weighted
    }

    pub fn neighbors(&self, node: NodeId) -> &[(NodeId, u32)] {
        &self.adjacency[node]
    }

    pub fn label(&self, node: NodeId) -> &str {
        &self.nodes[node].label
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeState {
    Unvisited,
    Frontier,
    Visiting,
    Visited,
    /// DFS dead end: finalized without discovering anything new.
    Backtrack,
}

/// Tentative shortest distance. `Infinite` sorts after every finite value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Distance {
    Finite(u64),
    Infinite,
}

impl Distance {
    pub fn finite(self) -> Option<u64> {
        match self {
            Distance::Finite(d) => Some(d),
            Distance::Infinite => None,
        }
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Finite(d) => write!(f, "{d}"),
            Distance::Infinite => write!(f, "∞"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphStepKind {
    Init,
    Visit,
    Enqueue,
    Push,
    Relax,
    Update,
    Backtrack,
    Complete,
}

/// One edge relaxation attempt: `current + weight` versus `best`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relaxation {
    pub from: NodeId,
    pub to: NodeId,
    pub current: u64,
    pub weight: u32,
    pub candidate: u64,
    pub best: Distance,
    pub improved: bool,
}

/// Distance-ordered entry of Dijkstra's priority list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub node: NodeId,
    pub distance: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphStep {
    pub kind: GraphStepKind,
    pub message: String,
    pub current: Option<NodeId>,
    pub node_states: Vec<NodeState>,
    pub highlighted_edges: Vec<(NodeId, NodeId)>,
    /// Queue (BFS, front first), stack (DFS, top last) or priority list
    /// nodes (Dijkstra, as stored).
    pub frontier: Vec<NodeId>,
    pub visited: Vec<NodeId>,
    /// Dijkstra only.
    pub priority: Option<Vec<QueueEntry>>,
    pub distances: Option<Vec<Distance>>,
    pub predecessors: Option<Vec<Option<NodeId>>>,
    pub relaxation: Option<Relaxation>,
}

impl Step for GraphStep {
    fn kind(&self) -> &'static str {
        match self.kind {
            GraphStepKind::Init => "init",
            GraphStepKind::Visit => "visit",
            GraphStepKind::Enqueue => "enqueue",
            GraphStepKind::Push => "push",
            GraphStepKind::Relax => "relax",
            GraphStepKind::Update => "update",
            GraphStepKind::Backtrack => "backtrack",
            GraphStepKind::Complete => "complete",
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Mutable working state of one search; `snapshot` copies it into a step.
struct Search<'g> {
    graph: &'g Graph,
    states: Vec<NodeState>,
    visited: Vec<NodeId>,
    distances: Option<Vec<Distance>>,
    predecessors: Option<Vec<Option<NodeId>>>,
    rec: Recorder<GraphStep>,
}

impl<'g> Search<'g> {
    fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            states: vec![NodeState::Unvisited; graph.node_count()],
            visited: Vec::new(),
            distances: None,
            predecessors: None,
            rec: Recorder::new("graph"),
        }
    }

    fn name(&self, node: NodeId) -> &'g str {
        self.graph.label(node)
    }

    fn emit(
        &mut self,
        kind: GraphStepKind,
        message: String,
        current: Option<NodeId>,
        highlighted_edges: Vec<(NodeId, NodeId)>,
        frontier: Vec<QueueEntry>,
        relaxation: Option<Relaxation>,
    ) {
        self.rec.emit(GraphStep {
            kind,
            message,
            current,
            node_states: self.states.clone(),
            highlighted_edges,
            frontier: frontier.iter().map(|entry| entry.node).collect(),
            priority: self.distances.is_some().then_some(frontier),
            visited: self.visited.clone(),
            distances: self.distances.clone(),
            predecessors: self.predecessors.clone(),
            relaxation,
        });
    }

    fn complete(mut self, algorithm: &str) -> Trace<GraphStep> {
        let unreached = self
            .states
            .iter()
            .filter(|s| **s == NodeState::Unvisited)
            .count();
        let message = if unreached == 0 {
            format!("{algorithm} complete: visited all {} nodes", self.visited.len())
        } else {
            format!(
                "{algorithm} complete: visited {} nodes, {unreached} unreachable",
                self.visited.len()
            )
        };
        self.emit(
            GraphStepKind::Complete,
            message,
            None,
            Vec::new(),
            Vec::new(),
            None,
        );
        self.rec.finish()
    }

    /// Trace for a start node that does not exist.
    fn invalid_start(mut self, algorithm: &str, start: NodeId) -> Trace<GraphStep> {
        self.emit(
            GraphStepKind::Init,
            format!("{algorithm} from node {start}"),
            None,
            Vec::new(),
            Vec::new(),
            None,
        );
        self.emit(
            GraphStepKind::Complete,
            format!(
                "Start node {start} is not in the graph ({} nodes)",
                self.graph.node_count()
            ),
            None,
            Vec::new(),
            Vec::new(),
            None,
        );
        self.rec.finish()
    }
}

/// Frontier entries for the unweighted searches, which carry no distance.
fn unranked(nodes: impl IntoIterator<Item = NodeId>) -> Vec<QueueEntry> {
    nodes
        .into_iter()
        .map(|node| QueueEntry { node, distance: 0 })
        .collect()
}

/// Breadth-first search with an explicit FIFO queue.
pub fn bfs(graph: &Graph, start: NodeId) -> Trace<GraphStep> {
    let mut search = Search::new(graph);
    if start >= graph.node_count() {
        return search.invalid_start("BFS", start);
    }

    let mut queue = VecDeque::from([start]);
    search.states[start] = NodeState::Frontier;
    search.emit(
        GraphStepKind::Init,
        format!("BFS from {}: enqueue the start node", search.name(start)),
        Some(start),
        Vec::new(),
        unranked(queue.iter().copied()),
        None,
    );

    while let Some(node) = queue.pop_front() {
        search.states[node] = NodeState::Visiting;
        search.visited.push(node);
        search.emit(
            GraphStepKind::Visit,
            format!("Dequeue and visit {}", search.name(node)),
            Some(node),
            Vec::new(),
            unranked(queue.iter().copied()),
            None,
        );

        for &(next, _) in graph.neighbors(node) {
            if search.states[next] != NodeState::Unvisited {
                continue;
            }
            search.states[next] = NodeState::Frontier;
            queue.push_back(next);
            search.emit(
                GraphStepKind::Enqueue,
                format!(
                    "Discover {} from {}, enqueue it",
                    search.name(next),
                    search.name(node)
                ),
                Some(node),
                vec![(node, next)],
                unranked(queue.iter().copied()),
                None,
            );
        }

        search.states[node] = NodeState::Visited;
    }

    search.complete("BFS")
}

/// Depth-first search with an explicit LIFO stack.
///
/// Neighbors are pushed in reverse adjacency order so they are visited in
/// adjacency order. A node can sit on the stack more than once; stale entries
/// are skipped when popped.
pub fn dfs(graph: &Graph, start: NodeId) -> Trace<GraphStep> {
    let mut search = Search::new(graph);
    if start >= graph.node_count() {
        return search.invalid_start("DFS", start);
    }

    let mut stack = vec![start];
    search.states[start] = NodeState::Frontier;
    search.emit(
        GraphStepKind::Init,
        format!("DFS from {}: push the start node", search.name(start)),
        Some(start),
        Vec::new(),
        unranked(stack.iter().copied()),
        None,
    );

    while let Some(node) = stack.pop() {
        if search.states[node] == NodeState::Visited {
            continue;
        }

        search.states[node] = NodeState::Visiting;
        search.visited.push(node);
        search.emit(
            GraphStepKind::Visit,
            format!("Pop and visit {}", search.name(node)),
            Some(node),
            Vec::new(),
            unranked(stack.iter().copied()),
            None,
        );

        let mut discovered = false;
        for &(next, _) in graph.neighbors(node).iter().rev() {
            if !matches!(
                search.states[next],
                NodeState::Unvisited | NodeState::Frontier
            ) {
                continue;
            }
            discovered = true;
            search.states[next] = NodeState::Frontier;
            stack.push(next);
            search.emit(
                GraphStepKind::Push,
                format!("Push neighbor {} of {}", search.name(next), search.name(node)),
                Some(node),
                vec![(node, next)],
                unranked(stack.iter().copied()),
                None,
            );
        }

        if discovered {
            search.states[node] = NodeState::Visited;
        } else {
            search.states[node] = NodeState::Backtrack;
            search.emit(
                GraphStepKind::Backtrack,
                format!("{} has no new neighbors, backtrack", search.name(node)),
                Some(node),
                Vec::new(),
                unranked(stack.iter().copied()),
                None,
            );
            search.states[node] = NodeState::Visited;
        }
    }

    search.complete("DFS")
}

/// Dijkstra's shortest paths from `start`.
///
/// The priority structure is a plain list, stably re-sorted by distance on
/// every extraction, so equal distances leave in insertion order.
pub fn dijkstra(graph: &Graph, start: NodeId) -> Trace<GraphStep> {
    let mut search = Search::new(graph);
    if start >= graph.node_count() {
        return search.invalid_start("Dijkstra", start);
    }

    let mut distances = vec![Distance::Infinite; graph.node_count()];
    distances[start] = Distance::Finite(0);
    search.distances = Some(distances);
    search.predecessors = Some(vec![None; graph.node_count()]);

    let mut pending = vec![QueueEntry {
        node: start,
        distance: 0,
    }];
    search.states[start] = NodeState::Frontier;
    search.emit(
        GraphStepKind::Init,
        format!(
            "Dijkstra from {}: distance 0, every other node ∞",
            search.name(start)
        ),
        Some(start),
        Vec::new(),
        pending.clone(),
        None,
    );

    loop {
        pending.sort_by_key(|entry| entry.distance);
        if pending.is_empty() {
            break;
        }
        let QueueEntry { node, distance } = pending.remove(0);
        if search.states[node] == NodeState::Visited {
            continue;
        }

        search.states[node] = NodeState::Visiting;
        search.visited.push(node);
        search.emit(
            GraphStepKind::Visit,
            format!(
                "Extract {} with smallest distance {distance}",
                search.name(node)
            ),
            Some(node),
            Vec::new(),
            pending.clone(),
            None,
        );

        for &(next, weight) in graph.neighbors(node) {
            let best = search.distance(next);
            let candidate = distance + u64::from(weight);
            let improved = Distance::Finite(candidate) < best;
            let relaxation = Relaxation {
                from: node,
                to: next,
                current: distance,
                weight,
                candidate,
                best,
                improved,
            };
            let verdict = if improved { "shorter" } else { "no improvement" };
            search.emit(
                GraphStepKind::Relax,
                format!(
                    "Relax {} -> {}: {distance} + {weight} = {candidate} vs {best} ({verdict})",
                    search.name(node),
                    search.name(next)
                ),
                Some(node),
                vec![(node, next)],
                pending.clone(),
                Some(relaxation),
            );

            if !improved {
                continue;
            }

            search.set_distance(next, candidate, node);
            if search.states[next] != NodeState::Visited {
                search.states[next] = NodeState::Frontier;
            }
            pending.push(QueueEntry {
                node: next,
                distance: candidate,
            });
            search.emit(
                GraphStepKind::Update,
                format!(
                    "Update {}: distance {candidate} via {}",
                    search.name(next),
                    search.name(node)
                ),
                Some(node),
                vec![(node, next)],
                pending.clone(),
                Some(relaxation),
            );
        }

        search.states[node] = NodeState::Visited;
    }

    search.complete("Dijkstra")
}

impl Search<'_> {
    fn distance(&self, node: NodeId) -> Distance {
        self.distances
            .as_ref()
            .map_or(Distance::Infinite, |d| d[node])
    }

    fn set_distance(&mut self, node: NodeId, distance: u64, via: NodeId) {
        if let Some(distances) = self.distances.as_mut() {
            distances[node] = Distance::Finite(distance);
        }
        if let Some(predecessors) = self.predecessors.as_mut() {
            predecessors[node] = Some(via);
        }
    }
}

/// Walk predecessor links back from `target`. Returns `None` when `target`
/// was never reached.
pub fn shortest_path(predecessors: &[Option<NodeId>], start: NodeId, target: NodeId) -> Option<Vec<NodeId>> {
    let mut path = vec![target];
    let mut node = target;
    while node != start {
        node = (*predecessors.get(node)?)?;
        if path.len() > predecessors.len() {
            return None;
        }
        path.push(node);
    }
    path.reverse();
    Some(path)
}
