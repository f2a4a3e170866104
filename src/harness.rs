//! The micro-benchmark harness.
//!
//! A workload is called `repeats` times back to back per round, and each
//! round records the average per-call latency. Timing uses
//! [`Instant`], which is monotonic and unaffected by system clock changes.
//!
//! The harness never catches anything. A panicking workload unwinds through
//! [`measure_rounds`]; a fallible workload passed to [`try_measure_rounds`]
//! has its error returned as-is, aborting the round in progress.

use crate::config::BenchmarkConfig;
use crate::error::HarnessError;
use crate::stats::Summary;
use serde::{Deserialize, Serialize};
use std::hint::black_box;
use std::time::{Duration, Instant};

/// Per-round average latencies, in microseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    repeats: u64,
    round_us: Vec<f64>,
}

impl RoundResult {
    /// Workload calls that went into each round.
    pub fn repeats(&self) -> u64 {
        self.repeats
    }

    /// Per-round averages in microseconds, in execution order.
    pub fn as_slice(&self) -> &[f64] {
        &self.round_us
    }

    /// Mean and spread across rounds.
    pub fn summary(&self) -> Result<Summary, HarnessError> {
        Summary::from_rounds(&self.round_us)
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.round_us
    }
}

/// Average microseconds per call for one round.
fn per_call_us(elapsed: Duration, repeats: u64) -> f64 {
    elapsed.as_secs_f64() * 1_000_000.0 / repeats as f64
}

/// Time an infallible workload.
///
/// Returns exactly `config.rounds()` entries. The workload's return value is
/// passed through [`black_box`] so the call cannot be optimized away.
pub fn measure_rounds<F, R>(config: &BenchmarkConfig, mut workload: F) -> RoundResult
where
    F: FnMut() -> R,
{
    let repeats = config.repeats();
    let mut round_us = Vec::with_capacity(config.rounds());

    for round in 0..config.rounds() {
        let start = Instant::now();
        for _ in 0..repeats {
            black_box(workload());
        }
        let avg = per_call_us(start.elapsed(), repeats);
        tracing::debug!(round, avg_us = avg, "round complete");
        round_us.push(avg);
    }

    RoundResult { repeats, round_us }
}

/// Time a fallible workload.
///
/// The first workload error stops measurement and is returned unchanged.
pub fn try_measure_rounds<F, R, E>(
    config: &BenchmarkConfig,
    mut workload: F,
) -> Result<RoundResult, E>
where
    F: FnMut() -> Result<R, E>,
{
    let repeats = config.repeats();
    let mut round_us = Vec::with_capacity(config.rounds());

    for round in 0..config.rounds() {
        let start = Instant::now();
        for _ in 0..repeats {
            black_box(workload()?);
        }
        let avg = per_call_us(start.elapsed(), repeats);
        tracing::debug!(round, avg_us = avg, "round complete");
        round_us.push(avg);
    }

    Ok(RoundResult { repeats, round_us })
}

/// Time a single batch of `calls` invocations and return the total elapsed
/// time. This is the plain "run it N times" measurement used for sweeps.
pub fn time_batch<F, R, E>(calls: u64, mut workload: F) -> Result<Duration, E>
where
    F: FnMut() -> Result<R, E>,
{
    let start = Instant::now();
    for _ in 0..calls {
        black_box(workload()?);
    }
    Ok(start.elapsed())
}
