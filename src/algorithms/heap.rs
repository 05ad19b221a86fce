//! Binary heap insert, extract and heap-sort over a dense array.
//!
//! The parent of index `i` is `(i - 1) / 2`; its children are `2i + 1` and
//! `2i + 2`. A single [`HeapKind`] decides the comparator for all three
//! operations.

use serde::{Deserialize, Serialize};

use crate::trace::{Recorder, Step, Trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeapKind {
    #[default]
    Max,
    Min,
}

impl HeapKind {
    /// True when `a` belongs above `b` in this heap.
    pub fn favors(self, a: i64, b: i64) -> bool {
        match self {
            HeapKind::Max => a > b,
            HeapKind::Min => a < b,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HeapKind::Max => "max",
            HeapKind::Min => "min",
        }
    }

    fn label(self) -> &'static str {
        match self {
            HeapKind::Max => "max-heap",
            HeapKind::Min => "min-heap",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeapStepKind {
    Init,
    /// New value appended at the end of the array.
    Append,
    Compare,
    Swap,
    /// Root value removed by extract.
    Extract,
    /// Last element moved into the root slot.
    MoveLast,
    /// Heapify is about to sift down an internal node.
    Heapify,
    /// Heap-sort fixed one more position of the sorted suffix.
    Sorted,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeapStep {
    pub kind: HeapStepKind,
    pub message: String,
    /// Copy of the heap array at this moment.
    pub array: Vec<i64>,
    pub highlighted: Vec<usize>,
    pub compared: Vec<usize>,
    /// Heap-sort only: positions at or after this index are final.
    pub sorted_boundary: Option<usize>,
    /// Extract only: the value removed from the root.
    pub extracted: Option<i64>,
}

impl Step for HeapStep {
    fn kind(&self) -> &'static str {
        match self.kind {
            HeapStepKind::Init => "init",
            HeapStepKind::Append => "append",
            HeapStepKind::Compare => "compare",
            HeapStepKind::Swap => "swap",
            HeapStepKind::Extract => "extract",
            HeapStepKind::MoveLast => "move_last",
            HeapStepKind::Heapify => "heapify",
            HeapStepKind::Sorted => "sorted",
            HeapStepKind::Complete => "complete",
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Working state shared by the three operations. Every emitted step takes a
/// fresh copy of `array`.
struct HeapRun {
    kind: HeapKind,
    array: Vec<i64>,
    sorted_boundary: Option<usize>,
    extracted: Option<i64>,
    rec: Recorder<HeapStep>,
}

impl HeapRun {
    fn new(kind: HeapKind, array: &[i64]) -> Self {
        Self {
            kind,
            array: array.to_vec(),
            sorted_boundary: None,
            extracted: None,
            rec: Recorder::new("heap"),
        }
    }

    fn emit(
        &mut self,
        kind: HeapStepKind,
        message: String,
        highlighted: Vec<usize>,
        compared: Vec<usize>,
    ) {
        self.rec.emit(HeapStep {
            kind,
            message,
            array: self.array.clone(),
            highlighted,
            compared,
            sorted_boundary: self.sorted_boundary,
            extracted: self.extracted,
        });
    }

    /// Sift the element at `index` down within `array[..len]`.
    fn sift_down(&mut self, mut index: usize, len: usize) {
        loop {
            let left = 2 * index + 1;
            let right = 2 * index + 2;
            if left >= len {
                break;
            }

            let mut compared = vec![index, left];
            let mut best = index;
            if self.kind.favors(self.array[left], self.array[best]) {
                best = left;
            }
            if right < len {
                compared.push(right);
                if self.kind.favors(self.array[right], self.array[best]) {
                    best = right;
                }
            }

            let message = if right < len {
                format!(
                    "Compare {} with children {} and {}",
                    self.array[index], self.array[left], self.array[right]
                )
            } else {
                format!(
                    "Compare {} with only child {}",
                    self.array[index], self.array[left]
                )
            };
            self.emit(HeapStepKind::Compare, message, vec![index], compared);

            if best == index {
                break;
            }

            self.array.swap(index, best);
            let message = format!(
                "Swap {} down with {} ({} order)",
                self.array[best],
                self.array[index],
                self.kind.label()
            );
            self.emit(HeapStepKind::Swap, message, vec![index, best], Vec::new());
            index = best;
        }
    }

    fn complete(mut self, message: String) -> Trace<HeapStep> {
        self.emit(HeapStepKind::Complete, message, Vec::new(), Vec::new());
        self.rec.finish()
    }
}

/// Append `value` and bubble it up toward the root.
pub fn insert(heap: &[i64], value: i64, kind: HeapKind) -> Trace<HeapStep> {
    let mut run = HeapRun::new(kind, heap);
    run.emit(
        HeapStepKind::Init,
        format!("Insert {value} into {} of size {}", kind.label(), heap.len()),
        Vec::new(),
        Vec::new(),
    );

    run.array.push(value);
    let mut index = run.array.len() - 1;
    run.emit(
        HeapStepKind::Append,
        format!("Append {value} at index {index}"),
        vec![index],
        Vec::new(),
    );

    while index > 0 {
        let parent = (index - 1) / 2;
        let child_value = run.array[index];
        let parent_value = run.array[parent];
        run.emit(
            HeapStepKind::Compare,
            format!("Compare {child_value} with parent {parent_value}"),
            vec![index],
            vec![index, parent],
        );

        if !kind.favors(child_value, parent_value) {
            break;
        }

        run.array.swap(index, parent);
        run.emit(
            HeapStepKind::Swap,
            format!("Swap {child_value} up past {parent_value}"),
            vec![parent, index],
            Vec::new(),
        );
        index = parent;
    }

    run.complete(format!("{value} settled at index {index}"))
}

/// Remove the root, move the last element into its slot and sift it down.
pub fn extract(heap: &[i64], kind: HeapKind) -> Trace<HeapStep> {
    let mut run = HeapRun::new(kind, heap);
    run.emit(
        HeapStepKind::Init,
        format!("Extract the root of a {} of size {}", kind.label(), heap.len()),
        Vec::new(),
        Vec::new(),
    );

    if run.array.is_empty() {
        return run.complete("Heap is empty, nothing to extract".to_string());
    }

    let root = run.array[0];
    run.extracted = Some(root);
    run.emit(
        HeapStepKind::Extract,
        format!("Remove root {root}"),
        vec![0],
        Vec::new(),
    );

    let last = run.array.len() - 1;
    let moved = run.array.swap_remove(0);
    debug_assert_eq!(moved, root);
    if last > 0 {
        let value = run.array[0];
        run.emit(
            HeapStepKind::MoveLast,
            format!("Move last element {value} into the root"),
            vec![0],
            Vec::new(),
        );
        let len = run.array.len();
        run.sift_down(0, len);
    }

    run.complete(format!("Extracted {root}"))
}

/// Bottom-up heapify only.
pub fn build_heap(array: &[i64], kind: HeapKind) -> Trace<HeapStep> {
    let mut run = HeapRun::new(kind, array);
    run.emit(
        HeapStepKind::Init,
        format!("Build a {} from {} elements", kind.label(), array.len()),
        Vec::new(),
        Vec::new(),
    );
    heapify(&mut run);
    run.complete("Heap property holds".to_string())
}

/// Heapify, then repeatedly move the root behind a shrinking sorted boundary.
///
/// A max-heap sorts ascending, a min-heap descending.
pub fn heap_sort(array: &[i64], kind: HeapKind) -> Trace<HeapStep> {
    let mut run = HeapRun::new(kind, array);
    let n = array.len();
    run.sorted_boundary = Some(n);
    run.emit(
        HeapStepKind::Init,
        format!("Heap-sort {n} elements with a {}", kind.label()),
        Vec::new(),
        Vec::new(),
    );

    heapify(&mut run);

    for end in (1..n).rev() {
        run.array.swap(0, end);
        let (top, tail) = (run.array[end], run.array[0]);
        run.emit(
            HeapStepKind::Swap,
            format!("Swap root {top} with {tail} at index {end}"),
            vec![0, end],
            Vec::new(),
        );
        run.sorted_boundary = Some(end);
        run.emit(
            HeapStepKind::Sorted,
            format!("{top} is in its final position {end}"),
            vec![end],
            Vec::new(),
        );
        run.sift_down(0, end);
    }

    if n > 0 {
        run.sorted_boundary = Some(0);
        let first = run.array[0];
        run.emit(
            HeapStepKind::Sorted,
            format!("{first} is in its final position 0"),
            vec![0],
            Vec::new(),
        );
    }

    run.complete(format!("Sorted {n} elements"))
}

fn heapify(run: &mut HeapRun) {
    let n = run.array.len();
    for index in (0..n / 2).rev() {
        let value = run.array[index];
        run.emit(
            HeapStepKind::Heapify,
            format!("Heapify subtree rooted at index {index} ({value})"),
            vec![index],
            Vec::new(),
        );
        run.sift_down(index, n);
    }
}

/// Whether `array` satisfies the heap property for `kind`.
pub fn is_heap(array: &[i64], kind: HeapKind) -> bool {
    (1..array.len()).all(|i| !kind.favors(array[i], array[(i - 1) / 2]))
}
