//! Integration tests for algotrace
//!
//! These tests exercise the algorithm families, the trace and tape layers and
//! playback together through the public API.

#[path = "../common/mod.rs"]
pub mod common;

pub mod cli;
pub mod monotonicity;
pub mod playback_flow;
pub mod request_flow;
pub mod trace_invariants;
