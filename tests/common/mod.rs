//! Shared test utilities for algotrace
//!
//! - Fixed structural inputs used across test modules
//! - proptest strategies for randomized inputs

pub mod fixtures;
pub mod strategies;
