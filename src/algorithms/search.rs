//! Linear and binary search.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::trace::{Recorder, Step, Trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStepKind {
    Init,
    Compare,
    Complete,
}

/// Classification carried by every search step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchOutcome {
    Searching,
    Found { index: usize },
    NotFound,
    /// Binary search was handed an array that is not sorted ascending.
    Unsorted,
}

/// Result of comparing the examined element against the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Less,
    Equal,
    Greater,
}

impl From<Ordering> for Comparison {
    fn from(ord: Ordering) -> Self {
        match ord {
            Ordering::Less => Comparison::Less,
            Ordering::Equal => Comparison::Equal,
            Ordering::Greater => Comparison::Greater,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchStep {
    pub kind: SearchStepKind,
    pub message: String,
    /// Index being examined (`mid` for binary search).
    pub index: Option<usize>,
    /// Binary search window; `high` may be -1 once the window is exhausted.
    pub low: Option<isize>,
    pub high: Option<isize>,
    /// How the examined element compares to the target.
    pub comparison: Option<Comparison>,
    pub comparisons: usize,
    pub outcome: SearchOutcome,
}

impl Step for SearchStep {
    fn kind(&self) -> &'static str {
        match self.kind {
            SearchStepKind::Init => "init",
            SearchStepKind::Compare => "compare",
            SearchStepKind::Complete => "complete",
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

impl SearchStep {
    fn new(kind: SearchStepKind, message: String, comparisons: usize) -> Self {
        Self {
            kind,
            message,
            index: None,
            low: None,
            high: None,
            comparison: None,
            comparisons,
            outcome: SearchOutcome::Searching,
        }
    }

    fn at(mut self, index: usize, comparison: Comparison) -> Self {
        self.index = Some(index);
        self.comparison = Some(comparison);
        self
    }

    fn window(mut self, low: isize, high: isize) -> Self {
        self.low = Some(low);
        self.high = Some(high);
        self
    }

    fn outcome(mut self, outcome: SearchOutcome) -> Self {
        self.outcome = outcome;
        self
    }
}

/// Scan forward one element at a time until `target` is found.
pub fn linear_search(array: &[i64], target: i64) -> Trace<SearchStep> {
    let mut rec = Recorder::new("search");
    rec.emit(SearchStep::new(
        SearchStepKind::Init,
        format!("Linear search for {target} in {} elements", array.len()),
        0,
    ));

    let mut comparisons = 0;
    for (i, &value) in array.iter().enumerate() {
        comparisons += 1;
        let cmp = Comparison::from(value.cmp(&target));
        let message = if cmp == Comparison::Equal {
            format!("array[{i}] = {value} equals {target}")
        } else {
            format!("array[{i}] = {value} is not {target}, move right")
        };
        rec.emit(SearchStep::new(SearchStepKind::Compare, message, comparisons).at(i, cmp));

        if cmp == Comparison::Equal {
            rec.emit(
                SearchStep::new(
                    SearchStepKind::Complete,
                    format!("Found {target} at index {i} after {comparisons} comparisons"),
                    comparisons,
                )
                .at(i, cmp)
                .outcome(SearchOutcome::Found { index: i }),
            );
            return rec.finish();
        }
    }

    rec.emit(
        SearchStep::new(
            SearchStepKind::Complete,
            format!("{target} not found after {comparisons} comparisons"),
            comparisons,
        )
        .outcome(SearchOutcome::NotFound),
    );
    rec.finish()
}

/// Halve a sorted window until `target` is found or the window is empty.
pub fn binary_search(array: &[i64], target: i64) -> Trace<SearchStep> {
    let mut rec = Recorder::new("search");
    let mut low: isize = 0;
    let mut high: isize = array.len() as isize - 1;

    rec.emit(
        SearchStep::new(
            SearchStepKind::Init,
            format!("Binary search for {target} in {} elements", array.len()),
            0,
        )
        .window(low, high),
    );

    if !array.windows(2).all(|w| w[0] <= w[1]) {
        rec.emit(
            SearchStep::new(
                SearchStepKind::Complete,
                "Binary search requires an array sorted in ascending order".to_string(),
                0,
            )
            .outcome(SearchOutcome::Unsorted),
        );
        return rec.finish();
    }

    let mut comparisons = 0;
    while low <= high {
        let mid = low + (high - low) / 2;
        let idx = mid as usize;
        let value = array[idx];
        comparisons += 1;
        let cmp = Comparison::from(value.cmp(&target));

        match cmp {
            Comparison::Equal => {
                rec.emit(
                    SearchStep::new(
                        SearchStepKind::Compare,
                        format!("mid = {mid}: array[{mid}] = {value} equals {target}"),
                        comparisons,
                    )
                    .at(idx, cmp)
                    .window(low, high),
                );
                rec.emit(
                    SearchStep::new(
                        SearchStepKind::Complete,
                        format!("Found {target} at index {mid} after {comparisons} comparisons"),
                        comparisons,
                    )
                    .at(idx, cmp)
                    .window(low, high)
                    .outcome(SearchOutcome::Found { index: idx }),
                );
                return rec.finish();
            }
            Comparison::Less => {
                rec.emit(
                    SearchStep::new(
                        SearchStepKind::Compare,
                        format!("mid = {mid}: {value} < {target}, search right half"),
                        comparisons,
                    )
                    .at(idx, cmp)
                    .window(low, high),
                );
                low = mid + 1;
            }
            Comparison::Greater => {
                rec.emit(
                    SearchStep::new(
                        SearchStepKind::Compare,
                        format!("mid = {mid}: {value} > {target}, search left half"),
                        comparisons,
                    )
                    .at(idx, cmp)
                    .window(low, high),
                );
                high = mid - 1;
            }
        }
    }

    rec.emit(
        SearchStep::new(
            SearchStepKind::Complete,
            format!("low {low} passed high {high}: {target} not found after {comparisons} comparisons"),
            comparisons,
        )
        .window(low, high)
        .outcome(SearchOutcome::NotFound),
    );
    rec.finish()
}
