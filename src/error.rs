//! Error types for the harness and the bundled workloads.

use thiserror::Error;

/// Errors produced by the harness itself.
///
/// Workload failures never appear here: fallible workloads report through
/// their own error type, which passes through [`crate::try_measure_rounds`]
/// untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HarnessError {
    #[error("invalid config: {field} must be positive, got {value}")]
    InvalidConfig { field: &'static str, value: i64 },

    #[error("invalid config: {field} is not a number: {raw:?}")]
    UnparsableConfig { field: &'static str, raw: String },

    #[error("cannot summarize an empty set of rounds")]
    EmptyInput,

    #[error("standard deviation needs at least 2 rounds, got {got}")]
    InsufficientSamples { got: usize },
}

/// Errors raised by the factorial workloads.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkloadError {
    #[error("recursion depth exceeded: n = {n} needs more than max_depth = {max_depth}")]
    DepthExceeded { n: u32, max_depth: u32 },

    #[error(transparent)]
    Harness(#[from] HarnessError),
}
