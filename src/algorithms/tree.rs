//! Binary tree traversals.
//!
//! The depth-first orders walk the tree recursively and mirror each call in an
//! explicit call-stack snapshot; level-order drives a FIFO queue instead.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::trace::{Recorder, Step, Trace};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub value: i64,
    pub left: Option<Box<TreeNode>>,
    pub right: Option<Box<TreeNode>>,
}

impl TreeNode {
    pub fn leaf(value: i64) -> Self {
        Self {
            value,
            left: None,
            right: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryTree {
    pub root: Option<Box<TreeNode>>,
}

impl BinaryTree {
    /// Build from a level-order listing where `None` marks a missing child,
    /// e.g. `[Some(1), None, Some(2)]`. Children of missing nodes are not
    /// listed.
    pub fn from_level_order(values: &[Option<i64>]) -> Self {
        let mut values = values.iter().copied();
        let Some(Some(root_value)) = values.next() else {
            return Self::default();
        };

        let mut root = Box::new(TreeNode::leaf(root_value));
        {
            // Slots are filled breadth-first; each pending node takes the
            // next two entries as its children.
            let mut pending: VecDeque<&mut TreeNode> = VecDeque::from([root.as_mut()]);
            while let Some(node) = pending.pop_front() {
                let Some(left) = values.next() else { break };
                let right = values.next().flatten();
                node.left = left.map(|v| Box::new(TreeNode::leaf(v)));
                node.right = right.map(|v| Box::new(TreeNode::leaf(v)));
                let TreeNode { left, right, .. } = node;
                if let Some(left) = left.as_deref_mut() {
                    pending.push_back(left);
                }
                if let Some(right) = right.as_deref_mut() {
                    pending.push_back(right);
                }
            }
        }
        Self { root: Some(root) }
    }

    /// Build a binary search tree by inserting `values` in order. Duplicates
    /// go to the right.
    pub fn from_bst_inserts(values: &[i64]) -> Self {
        fn insert(slot: &mut Option<Box<TreeNode>>, value: i64) {
            match slot {
                None => *slot = Some(Box::new(TreeNode::leaf(value))),
                Some(node) if value < node.value => insert(&mut node.left, value),
                Some(node) => insert(&mut node.right, value),
            }
        }

        let mut tree = Self::default();
        for &value in values {
            insert(&mut tree.root, value);
        }
        tree
    }

    pub fn len(&self) -> usize {
        fn count(node: &Option<Box<TreeNode>>) -> usize {
            node.as_ref()
                .map_or(0, |n| 1 + count(&n.left) + count(&n.right))
        }
        count(&self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn height(&self) -> usize {
        fn depth(node: &Option<Box<TreeNode>>) -> usize {
            node.as_ref()
                .map_or(0, |n| 1 + depth(&n.left).max(depth(&n.right)))
        }
        depth(&self.root)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TraversalOrder {
    InOrder,
    PreOrder,
    PostOrder,
    LevelOrder,
}

impl TraversalOrder {
    fn frame_name(self) -> &'static str {
        match self {
            TraversalOrder::InOrder => "inorder",
            TraversalOrder::PreOrder => "preorder",
            TraversalOrder::PostOrder => "postorder",
            TraversalOrder::LevelOrder => "levelorder",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeStepKind {
    Init,
    Push,
    Visit,
    Pop,
    Enqueue,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeStep {
    pub kind: TreeStepKind,
    pub message: String,
    pub current: Option<i64>,
    /// Values emitted so far, in traversal order.
    pub output: Vec<i64>,
    /// Simulated call frames, outermost first (depth-first orders only).
    pub call_stack: Vec<String>,
    /// Queued node values, front first (level-order only).
    pub queue: Vec<i64>,
}

impl Step for TreeStep {
    fn kind(&self) -> &'static str {
        match self.kind {
            TreeStepKind::Init => "init",
            TreeStepKind::Push => "push",
            TreeStepKind::Visit => "visit",
            TreeStepKind::Pop => "pop",
            TreeStepKind::Enqueue => "enqueue",
            TreeStepKind::Complete => "complete",
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

struct Walk {
    order: TraversalOrder,
    output: Vec<i64>,
    call_stack: Vec<String>,
    queue: Vec<i64>,
    rec: Recorder<TreeStep>,
}

impl Walk {
    fn new(order: TraversalOrder) -> Self {
        Self {
            order,
            output: Vec::new(),
            call_stack: Vec::new(),
            queue: Vec::new(),
            rec: Recorder::new("tree"),
        }
    }

    fn emit(&mut self, kind: TreeStepKind, message: String, current: Option<i64>) {
        self.rec.emit(TreeStep {
            kind,
            message,
            current,
            output: self.output.clone(),
            call_stack: self.call_stack.clone(),
            queue: self.queue.clone(),
        });
    }

    fn visit(&mut self, value: i64) {
        self.output.push(value);
        self.emit(TreeStepKind::Visit, format!("Visit {value}"), Some(value));
    }

    fn recurse(&mut self, node: &TreeNode) {
        let frame = format!("{}({})", self.order.frame_name(), node.value);
        self.call_stack.push(frame.clone());
        self.emit(TreeStepKind::Push, format!("Call {frame}"), Some(node.value));

        if self.order == TraversalOrder::PreOrder {
            self.visit(node.value);
        }
        if let Some(left) = node.left.as_deref() {
            self.recurse(left);
        }
        if self.order == TraversalOrder::InOrder {
            self.visit(node.value);
        }
        if let Some(right) = node.right.as_deref() {
            self.recurse(right);
        }
        if self.order == TraversalOrder::PostOrder {
            self.visit(node.value);
        }

        self.call_stack.pop();
        self.emit(
            TreeStepKind::Pop,
            format!("Return from {frame}"),
            Some(node.value),
        );
    }

    fn enqueue(&mut self, value: i64) {
        self.queue.push(value);
        self.emit(TreeStepKind::Enqueue, format!("Enqueue {value}"), Some(value));
    }

    fn level_order(&mut self, root: &TreeNode) {
        let mut queue = VecDeque::from([root]);
        self.enqueue(root.value);
        while let Some(node) = queue.pop_front() {
            self.queue.remove(0);
            self.visit(node.value);
            for child in [node.left.as_deref(), node.right.as_deref()]
                .into_iter()
                .flatten()
            {
                queue.push_back(child);
                self.enqueue(child.value);
            }
        }
    }
}

/// Traverse `tree` in the given order.
pub fn traverse(tree: &BinaryTree, order: TraversalOrder) -> Trace<TreeStep> {
    let mut walk = Walk::new(order);
    let label = order.frame_name();
    walk.emit(
        TreeStepKind::Init,
        format!("Start {label} traversal of {} nodes", tree.len()),
        None,
    );

    if let Some(root) = tree.root.as_deref() {
        match order {
            TraversalOrder::LevelOrder => walk.level_order(root),
            _ => walk.recurse(root),
        }
    }

    let joined = walk
        .output
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    walk.emit(
        TreeStepKind::Complete,
        format!("{label} traversal complete: [{joined}]"),
        None,
    );
    walk.rec.finish()
}

pub fn in_order(tree: &BinaryTree) -> Trace<TreeStep> {
    traverse(tree, TraversalOrder::InOrder)
}

pub fn pre_order(tree: &BinaryTree) -> Trace<TreeStep> {
    traverse(tree, TraversalOrder::PreOrder)
}

pub fn post_order(tree: &BinaryTree) -> Trace<TreeStep> {
    traverse(tree, TraversalOrder::PostOrder)
}

pub fn level_order(tree: &BinaryTree) -> Trace<TreeStep> {
    traverse(tree, TraversalOrder::LevelOrder)
}
