//! Configuration for the harness and the suite runner.

use crate::error::HarnessError;
use std::path::PathBuf;

/// Default workload calls per round.
pub const DEFAULT_REPEATS: u64 = 30_000;
/// Default number of timed rounds.
pub const DEFAULT_ROUNDS: usize = 10;

/// How many times to call a workload, and in how many timed rounds.
///
/// Both counts are positive; the only way to build one is through
/// [`BenchmarkConfig::new`], which rejects zero and negative values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchmarkConfig {
    repeats: u64,
    rounds: usize,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            repeats: DEFAULT_REPEATS,
            rounds: DEFAULT_ROUNDS,
        }
    }
}

impl BenchmarkConfig {
    /// Validate and build a config.
    ///
    /// Signed inputs are accepted so callers reading counts from the
    /// environment or the command line get `InvalidConfig` for negative
    /// values instead of a parse failure.
    pub fn new(repeats: i64, rounds: i64) -> Result<Self, HarnessError> {
        Ok(Self {
            repeats: positive("repeats", repeats)?,
            rounds: positive("rounds", rounds)? as usize,
        })
    }

    /// Workload calls per round.
    pub fn repeats(&self) -> u64 {
        self.repeats
    }

    /// Number of timed rounds.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Total workload calls across all rounds.
    pub fn total_calls(&self) -> u64 {
        self.repeats * self.rounds as u64
    }

    /// Replace the repeat count.
    pub fn with_repeats(self, repeats: i64) -> Result<Self, HarnessError> {
        Ok(Self {
            repeats: positive("repeats", repeats)?,
            ..self
        })
    }

    /// Replace the round count.
    pub fn with_rounds(self, rounds: i64) -> Result<Self, HarnessError> {
        Ok(Self {
            rounds: positive("rounds", rounds)? as usize,
            ..self
        })
    }
}

fn positive(field: &'static str, value: i64) -> Result<u64, HarnessError> {
    if value > 0 {
        Ok(value as u64)
    } else {
        Err(HarnessError::InvalidConfig { field, value })
    }
}

/// Configuration for the suite runner.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Repeats and rounds for every benchmark in the suite.
    pub bench: BenchmarkConfig,
    /// Warmup rounds (discarded).
    pub warmup_rounds: usize,
    /// Output directory for JSON results.
    pub output_dir: PathBuf,
    /// Print results to stderr.
    pub verbose: bool,
    /// Filter benchmarks by name substring.
    pub filter: Option<String>,
    /// Git SHA to include in results (for regression tracking).
    pub git_sha: Option<String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            bench: BenchmarkConfig::default(),
            warmup_rounds: 0,
            output_dir: PathBuf::from("target/factbench"),
            verbose: true,
            filter: None,
            git_sha: None,
        }
    }
}

impl RunnerConfig {
    /// Create a new config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse config from environment variables.
    ///
    /// Supported variables:
    /// - `BENCH_REPEATS`: workload calls per round (default: 30000)
    /// - `BENCH_ROUNDS`: timed rounds (default: 10)
    /// - `BENCH_WARMUP`: warmup rounds (default: 0)
    /// - `BENCH_VERBOSE`: verbose output (default: true)
    /// - `BENCH_OUTPUT_DIR`: output directory
    /// - `BENCH_FILTER`: filter benchmarks by name
    /// - `BENCH_GIT_SHA`: git commit hash
    ///
    /// A value that is set but does not parse as a number is an error, as
    /// is a repeat or round count that parses but is not positive.
    pub fn from_env() -> Result<Self, HarnessError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, HarnessError> {
        let mut cfg = Self::default();

        if let Some(n) = parse_number("BENCH_REPEATS", var("BENCH_REPEATS"))? {
            cfg.bench = cfg.bench.with_repeats(n)?;
        }
        if let Some(n) = parse_number("BENCH_ROUNDS", var("BENCH_ROUNDS"))? {
            cfg.bench = cfg.bench.with_rounds(n)?;
        }
        if let Some(n) = parse_number("BENCH_WARMUP", var("BENCH_WARMUP"))? {
            cfg.warmup_rounds = usize::try_from(n).map_err(|_| HarnessError::InvalidConfig {
                field: "BENCH_WARMUP",
                value: n,
            })?;
        }
        if let Some(v) = var("BENCH_VERBOSE") {
            cfg.verbose = v != "0" && !v.eq_ignore_ascii_case("false");
        }
        if let Some(v) = var("BENCH_OUTPUT_DIR") {
            cfg.output_dir = PathBuf::from(v);
        }
        if let Some(v) = var("BENCH_FILTER") {
            cfg.filter = Some(v);
        }
        cfg.git_sha = var("BENCH_GIT_SHA").or_else(detect_git_sha);

        Ok(cfg)
    }

    /// Set repeats and rounds.
    pub fn bench(mut self, bench: BenchmarkConfig) -> Self {
        self.bench = bench;
        self
    }

    /// Set the number of warmup rounds.
    pub fn warmup(mut self, n: usize) -> Self {
        self.warmup_rounds = n;
        self
    }

    /// Set the output directory.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = path.into();
        self
    }

    /// Set verbose output.
    pub fn verbose(mut self, v: bool) -> Self {
        self.verbose = v;
        self
    }

    /// Set filter pattern.
    pub fn filter(mut self, pattern: impl Into<String>) -> Self {
        self.filter = Some(pattern.into());
        self
    }

    /// Set git SHA.
    pub fn git_sha(mut self, sha: impl Into<String>) -> Self {
        self.git_sha = Some(sha.into());
        self
    }
}

fn parse_number(field: &'static str, raw: Option<String>) -> Result<Option<i64>, HarnessError> {
    raw.map(|raw| {
        raw.trim()
            .parse::<i64>()
            .map_err(|_| HarnessError::UnparsableConfig { field, raw })
    })
    .transpose()
}

fn detect_git_sha() -> Option<String> {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .and_then(|o| {
            if o.status.success() {
                String::from_utf8(o.stdout)
                    .ok()
                    .map(|s| s.trim().to_string())
            } else {
                None
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_accept_positive_counts() {
        let cfg = BenchmarkConfig::new(1000, 5).unwrap();
        assert_eq!(cfg.repeats(), 1000);
        assert_eq!(cfg.rounds(), 5);
        assert_eq!(cfg.total_calls(), 5000);
    }

    #[test]
    fn should_reject_zero_repeats() {
        assert_eq!(
            BenchmarkConfig::new(0, 5),
            Err(HarnessError::InvalidConfig {
                field: "repeats",
                value: 0
            })
        );
    }

    #[test]
    fn should_reject_zero_rounds() {
        assert_eq!(
            BenchmarkConfig::new(10, 0),
            Err(HarnessError::InvalidConfig {
                field: "rounds",
                value: 0
            })
        );
    }

    #[test]
    fn should_reject_negative_counts() {
        assert!(matches!(
            BenchmarkConfig::new(-1, 5),
            Err(HarnessError::InvalidConfig { field: "repeats", .. })
        ));
        assert!(matches!(
            BenchmarkConfig::new(5, -10),
            Err(HarnessError::InvalidConfig { field: "rounds", .. })
        ));
    }

    #[test]
    fn should_revalidate_when_replacing_counts() {
        let cfg = BenchmarkConfig::default();
        assert!(cfg.with_rounds(0).is_err());
        assert_eq!(cfg.with_repeats(7).unwrap().repeats(), 7);
        assert_eq!(cfg.with_repeats(7).unwrap().rounds(), DEFAULT_ROUNDS);
    }

    #[test]
    fn should_use_defaults_when_env_not_set() {
        let cfg = RunnerConfig::default();
        assert_eq!(cfg.bench.repeats(), DEFAULT_REPEATS);
        assert_eq!(cfg.bench.rounds(), DEFAULT_ROUNDS);
        assert_eq!(cfg.warmup_rounds, 0);
        assert!(cfg.verbose);
    }

    #[test]
    fn should_build_config_with_builder() {
        let cfg = RunnerConfig::new()
            .bench(BenchmarkConfig::new(100, 3).unwrap())
            .warmup(2)
            .verbose(false)
            .filter("fac_rec");

        assert_eq!(cfg.bench.rounds(), 3);
        assert_eq!(cfg.warmup_rounds, 2);
        assert!(!cfg.verbose);
        assert_eq!(cfg.filter, Some("fac_rec".to_string()));
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let pairs: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        }
    }

    #[test]
    fn should_read_counts_from_vars() {
        let cfg = RunnerConfig::from_vars(vars(&[
            ("BENCH_REPEATS", " 500 "),
            ("BENCH_ROUNDS", "4"),
            ("BENCH_WARMUP", "2"),
            ("BENCH_VERBOSE", "false"),
            ("BENCH_GIT_SHA", "abc123"),
        ]))
        .unwrap();
        assert_eq!(cfg.bench.repeats(), 500);
        assert_eq!(cfg.bench.rounds(), 4);
        assert_eq!(cfg.warmup_rounds, 2);
        assert!(!cfg.verbose);
        assert_eq!(cfg.git_sha.as_deref(), Some("abc123"));
    }

    #[test]
    fn should_reject_unparsable_count() {
        let err = RunnerConfig::from_vars(vars(&[("BENCH_ROUNDS", "ten")])).unwrap_err();
        assert_eq!(
            err,
            HarnessError::UnparsableConfig {
                field: "BENCH_ROUNDS",
                raw: "ten".to_string()
            }
        );
    }

    #[test]
    fn should_reject_count_beyond_i64() {
        let err = RunnerConfig::from_vars(vars(&[("BENCH_REPEATS", "99999999999999999999")]))
            .unwrap_err();
        assert!(matches!(
            err,
            HarnessError::UnparsableConfig { field: "BENCH_REPEATS", .. }
        ));
    }

    #[test]
    fn should_reject_unparsable_and_negative_warmup() {
        assert!(matches!(
            RunnerConfig::from_vars(vars(&[("BENCH_WARMUP", "lots")])),
            Err(HarnessError::UnparsableConfig { field: "BENCH_WARMUP", .. })
        ));
        assert!(matches!(
            RunnerConfig::from_vars(vars(&[("BENCH_WARMUP", "-1")])),
            Err(HarnessError::InvalidConfig { field: "BENCH_WARMUP", value: -1 })
        ));
    }

    #[test]
    fn should_reject_negative_count_from_vars() {
        assert_eq!(
            RunnerConfig::from_vars(vars(&[("BENCH_REPEATS", "-5")])).unwrap_err(),
            HarnessError::InvalidConfig {
                field: "repeats",
                value: -5
            }
        );
    }
}
