//! Array-backed list edits with explicit element shifting.
//!
//! Every operation validates its arguments before touching the store and
//! reports failures through [`ListEditResult::error`]; the caller's store is
//! never modified.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::trace::{Recorder, Step};

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ListError {
    #[error("index {index} is outside [0, {max}] for a list of size {size}")]
    IndexOutOfBounds {
        index: usize,
        size: usize,
        max: usize,
    },
    #[error("list is empty")]
    Empty,
    #[error("size {size} exceeds capacity {capacity}")]
    SizeExceedsCapacity { size: usize, capacity: usize },
}

/// Backing store with a logical size. Slots at or beyond `size` are unused.
/// `size <= capacity` holds for every store, deserialized ones included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoreSpec", into = "StoreSpec")]
pub struct ListStore {
    slots: Vec<Option<i64>>,
    size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreSpec {
    slots: Vec<Option<i64>>,
    size: usize,
}

impl TryFrom<StoreSpec> for ListStore {
    type Error = ListError;

    fn try_from(spec: StoreSpec) -> Result<Self, Self::Error> {
        if spec.size > spec.slots.len() {
            return Err(ListError::SizeExceedsCapacity {
                size: spec.size,
                capacity: spec.slots.len(),
            });
        }
        Ok(Self {
            slots: spec.slots,
            size: spec.size,
        })
    }
}

impl From<ListStore> for StoreSpec {
    fn from(store: ListStore) -> Self {
        Self {
            slots: store.slots,
            size: store.size,
        }
    }
}

impl ListStore {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            size: 0,
        }
    }

    /// Store holding `values` with at least `capacity` slots.
    pub fn from_values(values: &[i64], capacity: usize) -> Self {
        let mut slots: Vec<Option<i64>> = values.iter().copied().map(Some).collect();
        if slots.len() < capacity {
            slots.resize(capacity, None);
        }
        Self {
            slots,
            size: values.len(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Raw slot contents, `None` past the capacity.
    pub fn slot(&self, index: usize) -> Option<i64> {
        self.slots.get(index).copied().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Live elements in order.
    pub fn values(&self) -> Vec<i64> {
        self.slots[..self.size].iter().flatten().copied().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListStepKind {
    Init,
    Highlight,
    Resize,
    ShiftRight,
    ShiftLeft,
    Insert,
    Remove,
    Set,
    Get,
    Complete,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListStep {
    pub kind: ListStepKind,
    pub message: String,
    /// Copy of the backing store at this moment.
    pub store: ListStore,
    /// Slot being examined or written.
    pub index: Option<usize>,
    /// Shift source and destination slots.
    pub shift: Option<(usize, usize)>,
}

impl Step for ListStep {
    fn kind(&self) -> &'static str {
        match self.kind {
            ListStepKind::Init => "init",
            ListStepKind::Highlight => "highlight",
            ListStepKind::Resize => "resize",
            ListStepKind::ShiftRight => "shift_right",
            ListStepKind::ShiftLeft => "shift_left",
            ListStepKind::Insert => "insert",
            ListStepKind::Remove => "remove",
            ListStepKind::Set => "set",
            ListStepKind::Get => "get",
            ListStepKind::Complete => "complete",
            ListStepKind::Error => "error",
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Uniform outcome of every list operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEditResult {
    pub steps: Vec<ListStep>,
    pub final_state: ListStore,
    pub error: Option<ListError>,
    pub return_value: Option<i64>,
}

impl ListEditResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// One list operation with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ListOp {
    AddAt { index: usize, value: i64 },
    AddFirst { value: i64 },
    AddLast { value: i64 },
    Get { index: usize },
    Set { index: usize, value: i64 },
    RemoveAt { index: usize },
    RemoveFirst,
    RemoveLast,
}

impl ListOp {
    pub fn apply(self, store: &ListStore) -> ListEditResult {
        match self {
            ListOp::AddAt { index, value } => add_at(store, index, value),
            ListOp::AddFirst { value } => add_first(store, value),
            ListOp::AddLast { value } => add_last(store, value),
            ListOp::Get { index } => get(store, index),
            ListOp::Set { index, value } => set(store, index, value),
            ListOp::RemoveAt { index } => remove_at(store, index),
            ListOp::RemoveFirst => remove_first(store),
            ListOp::RemoveLast => remove_last(store),
        }
    }
}

struct Edit {
    store: ListStore,
    rec: Recorder<ListStep>,
}

impl Edit {
    fn begin(store: &ListStore, message: String) -> Self {
        let mut edit = Self {
            store: store.clone(),
            rec: Recorder::new("list"),
        };
        edit.emit(ListStepKind::Init, message, None, None);
        edit
    }

    fn emit(
        &mut self,
        kind: ListStepKind,
        message: String,
        index: Option<usize>,
        shift: Option<(usize, usize)>,
    ) {
        self.rec.emit(ListStep {
            kind,
            message,
            store: self.store.clone(),
            index,
            shift,
        });
    }

    fn ensure_capacity(&mut self) {
        if self.store.size < self.store.capacity() {
            return;
        }
        let old = self.store.capacity();
        let new = (old * 2).max(1);
        self.store.slots.resize(new, None);
        self.emit(
            ListStepKind::Resize,
            format!("Backing store is full, grow capacity {old} -> {new}"),
            None,
            None,
        );
    }

    fn finish(mut self, message: String, return_value: Option<i64>) -> ListEditResult {
        self.emit(ListStepKind::Complete, message, None, None);
        ListEditResult {
            final_state: self.store,
            steps: self.rec.into_steps(),
            error: None,
            return_value,
        }
    }
}

fn rejected(store: &ListStore, error: ListError) -> ListEditResult {
    ListEditResult {
        steps: vec![ListStep {
            kind: ListStepKind::Error,
            message: error.to_string(),
            store: store.clone(),
            index: None,
            shift: None,
        }],
        final_state: store.clone(),
        error: Some(error),
        return_value: None,
    }
}

fn check_index(store: &ListStore, index: usize, max: usize) -> Result<(), ListError> {
    if index > max {
        return Err(ListError::IndexOutOfBounds {
            index,
            size: store.size,
            max,
        });
    }
    Ok(())
}

/// Checks an element index in `[0, size - 1]`.
fn check_element(store: &ListStore, index: usize) -> Result<(), ListError> {
    if store.is_empty() {
        return Err(ListError::Empty);
    }
    check_index(store, index, store.size - 1)
}

/// Insert `value` at `index`, shifting the tail one slot right.
pub fn add_at(store: &ListStore, index: usize, value: i64) -> ListEditResult {
    if let Err(e) = check_index(store, index, store.size) {
        return rejected(store, e);
    }

    let mut edit = Edit::begin(store, format!("Add {value} at index {index}"));
    edit.ensure_capacity();
    edit.emit(
        ListStepKind::Highlight,
        format!("Target slot {index}"),
        Some(index),
        None,
    );

    for i in (index..edit.store.size).rev() {
        edit.store.slots[i + 1] = edit.store.slots[i];
        let moved = edit.store.slots[i + 1].unwrap_or_default();
        edit.emit(
            ListStepKind::ShiftRight,
            format!("Shift {moved} from slot {i} to {}", i + 1),
            Some(i + 1),
            Some((i, i + 1)),
        );
    }

    edit.store.slots[index] = Some(value);
    edit.store.size += 1;
    edit.emit(
        ListStepKind::Insert,
        format!("Write {value} into slot {index}"),
        Some(index),
        None,
    );
    let size = edit.store.size;
    edit.finish(format!("Added {value}, size is now {size}"), None)
}

pub fn add_first(store: &ListStore, value: i64) -> ListEditResult {
    add_at(store, 0, value)
}

pub fn add_last(store: &ListStore, value: i64) -> ListEditResult {
    add_at(store, store.size, value)
}

pub fn get(store: &ListStore, index: usize) -> ListEditResult {
    if let Err(e) = check_element(store, index) {
        return rejected(store, e);
    }

    let mut edit = Edit::begin(store, format!("Get element at index {index}"));
    let value = edit.store.slots[index];
    edit.emit(
        ListStepKind::Get,
        format!("Read slot {index}"),
        Some(index),
        None,
    );
    let shown = value.map_or_else(|| "nothing".to_string(), |v| v.to_string());
    edit.finish(format!("get({index}) returned {shown}"), value)
}

/// Overwrite the element at `index`; returns the previous value.
pub fn set(store: &ListStore, index: usize, value: i64) -> ListEditResult {
    if let Err(e) = check_element(store, index) {
        return rejected(store, e);
    }

    let mut edit = Edit::begin(store, format!("Set index {index} to {value}"));
    edit.emit(
        ListStepKind::Highlight,
        format!("Target slot {index}"),
        Some(index),
        None,
    );
    let previous = edit.store.slots[index].replace(value);
    edit.emit(
        ListStepKind::Set,
        format!("Overwrite slot {index} with {value}"),
        Some(index),
        None,
    );
    edit.finish(format!("Set index {index} to {value}"), previous)
}

/// Remove the element at `index`, shifting the tail one slot left.
pub fn remove_at(store: &ListStore, index: usize) -> ListEditResult {
    if let Err(e) = check_element(store, index) {
        return rejected(store, e);
    }

    let mut edit = Edit::begin(store, format!("Remove element at index {index}"));
    edit.emit(
        ListStepKind::Highlight,
        format!("Target slot {index}"),
        Some(index),
        None,
    );
    let removed = edit.store.slots[index].take();
    let shown = removed.map_or_else(|| "nothing".to_string(), |v| v.to_string());
    edit.emit(
        ListStepKind::Remove,
        format!("Take {shown} out of slot {index}"),
        Some(index),
        None,
    );

    let size = edit.store.size;
    for i in index + 1..size {
        edit.store.slots[i - 1] = edit.store.slots[i];
        let moved = edit.store.slots[i - 1].unwrap_or_default();
        edit.emit(
            ListStepKind::ShiftLeft,
            format!("Shift {moved} from slot {i} to {}", i - 1),
            Some(i - 1),
            Some((i, i - 1)),
        );
    }
    edit.store.slots[size - 1] = None;
    edit.store.size -= 1;
    let size = edit.store.size;
    edit.finish(format!("Removed {shown}, size is now {size}"), removed)
}

pub fn remove_first(store: &ListStore) -> ListEditResult {
    remove_at(store, 0)
}

pub fn remove_last(store: &ListStore) -> ListEditResult {
    if store.is_empty() {
        return rejected(store, ListError::Empty);
    }
    remove_at(store, store.size - 1)
}
