//! Summary statistics over per-round latencies.

use crate::error::HarnessError;
use serde::{Deserialize, Serialize};

/// Arithmetic mean. Fails on empty input.
///
/// Accumulates offsets from the first value, so `n` copies of `v` average
/// to exactly `v`.
pub fn mean(values: &[f64]) -> Result<f64, HarnessError> {
    let base = *values.first().ok_or(HarnessError::EmptyInput)?;
    let offset = values.iter().map(|v| v - base).sum::<f64>() / values.len() as f64;
    Ok(base + offset)
}

/// Sample standard deviation (`n - 1` denominator).
///
/// Fewer than two values is `InsufficientSamples`, never a silent zero.
pub fn sample_stdev(values: &[f64]) -> Result<f64, HarnessError> {
    if values.is_empty() {
        return Err(HarnessError::EmptyInput);
    }
    if values.len() < 2 {
        return Err(HarnessError::InsufficientSamples { got: values.len() });
    }
    let mean = mean(values)?;
    let variance = values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / (values.len() - 1) as f64;
    Ok(variance.sqrt())
}

/// Mean and spread of a set of rounds, in microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Mean per-call latency across rounds.
    pub mean: f64,
    /// Sample standard deviation; absent when there was a single round.
    #[serde(skip_serializing_if = "Option::is_none")]
    stdev: Option<f64>,
    /// Fastest round.
    pub min: f64,
    /// Slowest round.
    pub max: f64,
    /// Number of rounds summarized.
    pub samples: usize,
}

impl Summary {
    /// Summarize per-round latencies. Fails only on empty input.
    pub fn from_rounds(values: &[f64]) -> Result<Self, HarnessError> {
        let mean = mean(values)?;
        let stdev = match sample_stdev(values) {
            Ok(s) => Some(s),
            Err(HarnessError::InsufficientSamples { .. }) => None,
            Err(e) => return Err(e),
        };
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Ok(Self {
            mean,
            stdev,
            min,
            max,
            samples: values.len(),
        })
    }

    /// Sample standard deviation across rounds.
    pub fn stdev(&self) -> Result<f64, HarnessError> {
        self.stdev
            .ok_or(HarnessError::InsufficientSamples { got: self.samples })
    }

    /// Coefficient of variation (`stdev / mean`), when both are defined.
    /// Shown next to each benchmark in verbose console output.
    pub fn relative_spread(&self) -> Option<f64> {
        match self.stdev {
            Some(s) if self.mean > 0.0 => Some(s / self.mean),
            _ => None,
        }
    }
}
