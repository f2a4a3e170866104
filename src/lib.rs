//! # factbench
//!
//! A micro-benchmark harness for comparing factorial implementations.
//!
//! A workload is called `repeats` times back to back per round; each round
//! records the average per-call latency in microseconds, and the rounds are
//! summarized as a mean and a sample standard deviation.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use factbench::{fac_iter, measure_rounds, BenchmarkConfig};
//!
//! let config = BenchmarkConfig::new(30_000, 10)?;
//! let rounds = measure_rounds(&config, || fac_iter(100));
//! let summary = rounds.summary()?;
//!
//! println!("Mean:  {:.2} µs", summary.mean);
//! println!("Stdev: {:.2} µs", summary.stdev()?);
//! # Ok::<(), factbench::HarnessError>(())
//! ```
//!
//! Recursive workloads take their depth limit as a parameter
//! ([`fac_rec`]) rather than relying on any process-wide setting.

mod config;
mod diagnostics;
mod error;
mod harness;
mod report;
mod result;
mod runner;
mod stats;
mod workloads;

pub use config::{BenchmarkConfig, RunnerConfig, DEFAULT_REPEATS, DEFAULT_ROUNDS};
pub use diagnostics::{Diagnostic, WorkloadListing};
pub use error::{HarnessError, WorkloadError};
pub use harness::{measure_rounds, time_batch, try_measure_rounds, RoundResult};
pub use report::{group_thousands, ConsoleReporter, JsonReporter, Reporter};
pub use result::{BenchResult, RuntimeInfo, SuiteResult};
pub use runner::{BenchGroup, BenchRunner};
pub use stats::{mean, sample_stdev, Summary};
pub use workloads::{fac_iter, fac_rec, fac_while, register_workloads, BigNat, Variant};
