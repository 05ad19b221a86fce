//! Instrumented algorithm families.
//!
//! Each routine takes its structural input by reference, works on a private
//! copy, and records one owned snapshot per state-changing event.

pub mod graph;
pub mod heap;
pub mod linked_list;
pub mod list;
pub mod matrix;
pub mod search;
pub mod tree;

pub use graph::{Graph, GraphStep, NodeId};
pub use heap::{HeapKind, HeapStep};
pub use linked_list::{LinkedListEditResult, LinkedListOp, LinkedStep};
pub use list::{ListEditResult, ListError, ListOp, ListStep, ListStore};
pub use matrix::{Matrix, MatrixOrder, MatrixStep};
pub use search::{SearchOutcome, SearchStep};
pub use tree::{BinaryTree, TraversalOrder, TreeStep};
