//! Benchmark result types.

use crate::stats::Summary;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Result of one benchmarked workload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchResult {
    /// Full name including suite: "suite/benchmark"
    pub name: String,
    /// Workload calls per round
    pub repeats: u64,
    /// Per-round average latency in microseconds
    pub round_us: Vec<f64>,
    /// Mean and spread of `round_us`
    pub summary: Summary,
}

impl BenchResult {
    /// Number of timed rounds.
    pub fn rounds(&self) -> usize {
        self.round_us.len()
    }

    /// Total workload calls across all rounds.
    pub fn total_calls(&self) -> u64 {
        self.repeats * self.rounds() as u64
    }

    /// Mean latency relative to `baseline`; above 1.0 is slower.
    pub fn slowdown(&self, baseline: &BenchResult) -> f64 {
        self.summary.mean / baseline.summary.mean
    }

    /// Slower than `baseline` by more than `threshold` (0.05 = 5%).
    pub fn is_regression(&self, baseline: &BenchResult, threshold: f64) -> bool {
        self.slowdown(baseline) > 1.0 + threshold
    }
}

/// How the suite was built and where it ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeInfo {
    pub crate_version: String,
    /// `rustc --version` of the compiler that built this binary
    #[serde(default)]
    pub rustc: String,
    pub os: String,
    pub arch: String,
    /// "release" or "debug"
    pub profile: String,
}

impl RuntimeInfo {
    pub fn current() -> Self {
        Self {
            crate_version: env!("CARGO_PKG_VERSION").to_string(),
            rustc: env!("FACTBENCH_RUSTC_VERSION").to_string(),
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            profile: if cfg!(debug_assertions) {
                "debug".to_string()
            } else {
                "release".to_string()
            },
        }
    }
}

impl std::fmt::Display for RuntimeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "factbench {} built with {} ({}-{}, {} build)",
            self.crate_version, self.rustc, self.arch, self.os, self.profile
        )
    }
}

/// Results for an entire benchmark suite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResult {
    pub suite: String,
    pub results: Vec<BenchResult>,
    /// Wall time of the whole suite, stored as fractional seconds
    #[serde(rename = "total_secs", with = "secs_f64")]
    pub total_duration: Duration,
    /// Unix milliseconds when the suite started
    pub started_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_sha: Option<String>,
    pub runtime: RuntimeInfo,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

impl SuiteResult {
    /// Read a suite previously written by the JSON reporter.
    pub fn load(path: impl AsRef<std::path::Path>) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Benchmarks that regressed against the same-named baseline entry,
    /// paired with their slowdown ratio. Names missing from either side are
    /// skipped.
    pub fn find_regressions(
        &self,
        baseline: &SuiteResult,
        threshold: f64,
    ) -> Vec<(&BenchResult, f64)> {
        self.results
            .iter()
            .filter_map(|r| {
                let base = baseline.results.iter().find(|b| b.name == r.name)?;
                r.is_regression(base, threshold)
                    .then(|| (r, r.slowdown(base)))
            })
            .collect()
    }
}

mod secs_f64 {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
