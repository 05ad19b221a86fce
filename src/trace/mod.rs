//! Step model and trace materialization.
//!
//! Every instrumented algorithm records its progress as a sequence of owned
//! step snapshots. A [`Trace`] is the materialized, immutable form of that
//! sequence: it can be indexed in any order and shared between any number of
//! readers, because nothing writes into a step after it has been emitted.

pub mod tape;

use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use thiserror::Error;

/// Narrow surface shared by every step family.
///
/// Renderers and the playback layer only rely on this trait, so they can
/// consume a `&dyn Step` without knowing which algorithm produced it.
pub trait Step: fmt::Debug {
    /// Short snake_case tag, e.g. `visit`, `swap`, `relax`, `complete`.
    fn kind(&self) -> &'static str;

    /// Human-readable narration for this moment of the run.
    fn message(&self) -> &str;

    /// Whether this step terminates a trace.
    fn is_complete(&self) -> bool {
        self.kind() == "complete"
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TraceError {
    #[error("trace has no steps")]
    Empty,
    #[error("trace must end with a complete step, found `{kind}`")]
    Unterminated { kind: &'static str },
}

/// Materialized, immutable sequence of steps for one (algorithm, input) run.
///
/// Cloning a trace is cheap: the steps live behind a shared `Arc`.
#[derive(Debug)]
pub struct Trace<S> {
    steps: Arc<[S]>,
}

impl<S> Clone for Trace<S> {
    fn clone(&self) -> Self {
        Self {
            steps: Arc::clone(&self.steps),
        }
    }
}

impl<S: Step> Trace<S> {
    /// Fully realize a step sequence produced outside a [`Recorder`].
    pub fn materialize<I>(steps: I) -> Result<Self, TraceError>
    where
        I: IntoIterator<Item = S>,
    {
        let steps: Vec<S> = steps.into_iter().collect();
        match steps.last() {
            None => Err(TraceError::Empty),
            Some(last) if !last.is_complete() => Err(TraceError::Unterminated { kind: last.kind() }),
            Some(_) => Ok(Self {
                steps: steps.into(),
            }),
        }
    }
}

impl<S> Trace<S> {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&S> {
        self.steps.get(index)
    }

    pub fn first(&self) -> Option<&S> {
        self.steps.first()
    }

    pub fn last(&self) -> Option<&S> {
        self.steps.last()
    }

    pub fn steps(&self) -> &[S] {
        &self.steps
    }

    pub fn iter(&self) -> std::slice::Iter<'_, S> {
        self.steps.iter()
    }

    /// Index of the final step (0 for an empty trace).
    pub fn last_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }
}

impl<S: PartialEq> PartialEq for Trace<S> {
    fn eq(&self, other: &Self) -> bool {
        self.steps == other.steps
    }
}

impl<S> Index<usize> for Trace<S> {
    type Output = S;

    fn index(&self, index: usize) -> &S {
        &self.steps[index]
    }
}

impl<'a, S> IntoIterator for &'a Trace<S> {
    type Item = &'a S;
    type IntoIter = std::slice::Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// Append-only step accumulator used by the instrumented algorithms.
///
/// `emit` takes ownership of the step, so any container attached to it must
/// already be a copy of the algorithm's working state.
#[derive(Debug)]
pub struct Recorder<S> {
    family: &'static str,
    steps: Vec<S>,
}

impl<S: Step> Recorder<S> {
    pub fn new(family: &'static str) -> Self {
        Self {
            family,
            steps: Vec::new(),
        }
    }

    pub fn emit(&mut self, step: S) {
        self.steps.push(step);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Seal the recorded steps into a trace.
    pub fn finish(self) -> Trace<S> {
        debug_assert!(
            self.steps.last().is_some_and(Step::is_complete),
            "{} trace must end with a complete step",
            self.family
        );
        tracing::debug!(
            family = self.family,
            steps = self.steps.len(),
            "Materialized trace"
        );
        Trace {
            steps: self.steps.into(),
        }
    }

    /// Hand back the raw steps, for results that expose a plain list.
    pub fn into_steps(self) -> Vec<S> {
        self.steps
    }
}
