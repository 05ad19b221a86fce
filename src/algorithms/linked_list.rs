//! Singly linked list edits, reported with the same result shape as the
//! array-backed list.
//!
//! The list keeps only a head pointer, so reaching position `i` walks `i`
//! links and every hop is a `traverse` step.

use serde::{Deserialize, Serialize};

use crate::algorithms::list::ListError;
use crate::trace::{Recorder, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkedStepKind {
    Init,
    Traverse,
    /// New node allocated but not yet reachable from the list.
    Allocate,
    Link,
    Unlink,
    Get,
    Complete,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedStep {
    pub kind: LinkedStepKind,
    pub message: String,
    /// Node values from head to tail.
    pub nodes: Vec<i64>,
    /// Node the traversal pointer rests on.
    pub pointer: Option<usize>,
    /// Value of an allocated node that is not linked yet.
    pub pending: Option<i64>,
}

impl Step for LinkedStep {
    fn kind(&self) -> &'static str {
        match self.kind {
            LinkedStepKind::Init => "init",
            LinkedStepKind::Traverse => "traverse",
            LinkedStepKind::Allocate => "allocate",
            LinkedStepKind::Link => "link",
            LinkedStepKind::Unlink => "unlink",
            LinkedStepKind::Get => "get",
            LinkedStepKind::Complete => "complete",
            LinkedStepKind::Error => "error",
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedListEditResult {
    pub steps: Vec<LinkedStep>,
    pub final_state: Vec<i64>,
    pub error: Option<ListError>,
    pub return_value: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum LinkedListOp {
    AddAt { index: usize, value: i64 },
    AddFirst { value: i64 },
    AddLast { value: i64 },
    Get { index: usize },
    RemoveAt { index: usize },
    RemoveFirst,
    RemoveLast,
}

impl LinkedListOp {
    pub fn apply(self, list: &[i64]) -> LinkedListEditResult {
        match self {
            LinkedListOp::AddAt { index, value } => add_at(list, index, value),
            LinkedListOp::AddFirst { value } => add_first(list, value),
            LinkedListOp::AddLast { value } => add_last(list, value),
            LinkedListOp::Get { index } => get(list, index),
            LinkedListOp::RemoveAt { index } => remove_at(list, index),
            LinkedListOp::RemoveFirst => remove_first(list),
            LinkedListOp::RemoveLast => remove_last(list),
        }
    }
}

struct Walk {
    nodes: Vec<i64>,
    pointer: Option<usize>,
    pending: Option<i64>,
    rec: Recorder<LinkedStep>,
}

impl Walk {
    fn begin(list: &[i64], message: String) -> Self {
        let mut walk = Self {
            nodes: list.to_vec(),
            pointer: None,
            pending: None,
            rec: Recorder::new("linked_list"),
        };
        walk.emit(LinkedStepKind::Init, message);
        walk
    }

    fn emit(&mut self, kind: LinkedStepKind, message: String) {
        self.rec.emit(LinkedStep {
            kind,
            message,
            nodes: self.nodes.clone(),
            pointer: self.pointer,
            pending: self.pending,
        });
    }

    /// Walk from the head to node `target`, one hop per step.
    fn advance_to(&mut self, target: usize) {
        for i in 0..=target {
            self.pointer = Some(i);
            let message = if i == 0 {
                format!("Start at head ({})", self.nodes[0])
            } else {
                format!("Follow next to node {i} ({})", self.nodes[i])
            };
            self.emit(LinkedStepKind::Traverse, message);
        }
    }

    fn finish(mut self, message: String, return_value: Option<i64>) -> LinkedListEditResult {
        self.pointer = None;
        self.emit(LinkedStepKind::Complete, message);
        LinkedListEditResult {
            final_state: self.nodes,
            steps: self.rec.into_steps(),
            error: None,
            return_value,
        }
    }
}

fn rejected(list: &[i64], error: ListError) -> LinkedListEditResult {
    LinkedListEditResult {
        steps: vec![LinkedStep {
            kind: LinkedStepKind::Error,
            message: error.to_string(),
            nodes: list.to_vec(),
            pointer: None,
            pending: None,
        }],
        final_state: list.to_vec(),
        error: Some(error),
        return_value: None,
    }
}

fn out_of_bounds(list: &[i64], index: usize, max: usize) -> ListError {
    ListError::IndexOutOfBounds {
        index,
        size: list.len(),
        max,
    }
}

pub fn add_at(list: &[i64], index: usize, value: i64) -> LinkedListEditResult {
    if index > list.len() {
        return rejected(list, out_of_bounds(list, index, list.len()));
    }

    let mut walk = Walk::begin(list, format!("Add {value} at position {index}"));
    walk.pending = Some(value);
    walk.emit(LinkedStepKind::Allocate, format!("Allocate node {value}"));

    if index == 0 {
        walk.nodes.insert(0, value);
        walk.pending = None;
        walk.emit(
            LinkedStepKind::Link,
            format!("New node {value} becomes the head"),
        );
    } else {
        walk.advance_to(index - 1);
        let prev = walk.nodes[index - 1];
        walk.nodes.insert(index, value);
        walk.pending = None;
        walk.emit(
            LinkedStepKind::Link,
            format!("Link {value} after {prev}"),
        );
    }

    let len = walk.nodes.len();
    walk.finish(format!("Added {value}, length is now {len}"), None)
}

pub fn add_first(list: &[i64], value: i64) -> LinkedListEditResult {
    add_at(list, 0, value)
}

pub fn add_last(list: &[i64], value: i64) -> LinkedListEditResult {
    add_at(list, list.len(), value)
}

pub fn get(list: &[i64], index: usize) -> LinkedListEditResult {
    if list.is_empty() {
        return rejected(list, ListError::Empty);
    }
    if index >= list.len() {
        return rejected(list, out_of_bounds(list, index, list.len() - 1));
    }

    let mut walk = Walk::begin(list, format!("Get node at position {index}"));
    walk.advance_to(index);
    let value = walk.nodes[index];
    walk.emit(LinkedStepKind::Get, format!("Read {value}"));
    walk.finish(format!("get({index}) returned {value}"), Some(value))
}

pub fn remove_at(list: &[i64], index: usize) -> LinkedListEditResult {
    if list.is_empty() {
        return rejected(list, ListError::Empty);
    }
    if index >= list.len() {
        return rejected(list, out_of_bounds(list, index, list.len() - 1));
    }

    let mut walk = Walk::begin(list, format!("Remove node at position {index}"));
    let removed = if index == 0 {
        let removed = walk.nodes.remove(0);
        walk.emit(
            LinkedStepKind::Unlink,
            format!("Head moves past {removed}"),
        );
        removed
    } else {
        walk.advance_to(index - 1);
        let prev = walk.nodes[index - 1];
        let removed = walk.nodes.remove(index);
        walk.emit(
            LinkedStepKind::Unlink,
            format!("Unlink {removed}: {prev} now skips it"),
        );
        removed
    };

    let len = walk.nodes.len();
    walk.finish(
        format!("Removed {removed}, length is now {len}"),
        Some(removed),
    )
}

pub fn remove_first(list: &[i64]) -> LinkedListEditResult {
    remove_at(list, 0)
}

pub fn remove_last(list: &[i64]) -> LinkedListEditResult {
    if list.is_empty() {
        return rejected(list, ListError::Empty);
    }
    remove_at(list, list.len() - 1)
}
