//! The suite runner: times named workloads and hands results to reporters.

use crate::config::RunnerConfig;
use crate::diagnostics::{self, Diagnostic};
use crate::harness::{measure_rounds, try_measure_rounds, RoundResult};
use crate::report::{ConsoleReporter, JsonReporter, Reporter};
use crate::result::{BenchResult, RuntimeInfo, SuiteResult};
use std::collections::HashMap;
use std::hint::black_box;
use std::time::Instant;

/// Runs a suite of micro-benchmarks with one shared [`RunnerConfig`].
///
/// # Example
///
/// ```rust,no_run
/// use factbench::{fac_iter, BenchRunner};
///
/// let mut runner = BenchRunner::new("factorial").unwrap();
/// runner.run("fac_iter(100)", || fac_iter(100));
/// let suite = runner.finish();
/// println!("{}", suite.results[0].summary.mean);
/// ```
pub struct BenchRunner {
    suite: String,
    config: RunnerConfig,
    runtime: RuntimeInfo,
    results: Vec<BenchResult>,
    suite_start: Instant,
    started_at: String,
    reporters: Vec<Box<dyn Reporter>>,
    diagnostics: Vec<Box<dyn Diagnostic>>,
    metadata: HashMap<String, String>,
    announced: bool,
}

impl BenchRunner {
    /// Create a new runner with config from the environment.
    pub fn new(suite: &str) -> Result<Self, crate::HarnessError> {
        Ok(Self::with_config(suite, RunnerConfig::from_env()?))
    }

    /// Create a new runner with explicit config.
    ///
    /// Reporters hear `suite_start` just before the first benchmark (or at
    /// `finish` for an empty suite), so reporters swapped in after
    /// construction still see it.
    pub fn with_config(suite: &str, config: RunnerConfig) -> Self {
        let mut reporters: Vec<Box<dyn Reporter>> = Vec::new();
        if config.verbose {
            reporters.push(Box::new(ConsoleReporter::new()));
        }
        reporters.push(Box::new(JsonReporter::new(config.output_dir.clone())));

        Self {
            suite: suite.to_string(),
            config,
            runtime: RuntimeInfo::current(),
            results: Vec::new(),
            suite_start: Instant::now(),
            started_at: unix_millis(),
            reporters,
            diagnostics: Vec::new(),
            metadata: HashMap::new(),
            announced: false,
        }
    }

    fn announce(&mut self) {
        if self.announced {
            return;
        }
        self.announced = true;
        for r in &self.reporters {
            r.suite_start(&self.suite, &self.config, &self.runtime);
        }
    }

    /// Add custom metadata to the suite results.
    pub fn metadata(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Replace reporters with a custom set.
    pub fn reporters(&mut self, reporters: Vec<Box<dyn Reporter>>) -> &mut Self {
        self.reporters = reporters;
        self
    }

    /// Add an additional reporter.
    pub fn add_reporter(&mut self, reporter: Box<dyn Reporter>) -> &mut Self {
        self.reporters.push(reporter);
        self
    }

    /// Attach a diagnostic, dumped to stderr when the suite finishes.
    pub fn add_diagnostic(&mut self, diagnostic: Box<dyn Diagnostic>) -> &mut Self {
        self.diagnostics.push(diagnostic);
        self
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    fn should_run(&self, name: &str) -> bool {
        match &self.config.filter {
            Some(f) => name.contains(f.as_str()),
            None => true,
        }
    }

    /// Benchmark an infallible workload.
    pub fn run<F, R>(&mut self, name: &str, mut f: F)
    where
        F: FnMut() -> R,
    {
        if !self.should_run(name) {
            return;
        }
        self.start(name);
        for _ in 0..self.config.warmup_rounds {
            for _ in 0..self.config.bench.repeats() {
                black_box(f());
            }
        }
        let rounds = measure_rounds(&self.config.bench, f);
        self.record(name, rounds);
    }

    /// Benchmark a fallible workload.
    ///
    /// The first workload error, during warmup or measurement, is returned
    /// unchanged and nothing is recorded for this benchmark.
    pub fn try_run<F, R, E>(&mut self, name: &str, mut f: F) -> Result<(), E>
    where
        F: FnMut() -> Result<R, E>,
    {
        if !self.should_run(name) {
            return Ok(());
        }
        self.start(name);
        for _ in 0..self.config.warmup_rounds {
            for _ in 0..self.config.bench.repeats() {
                black_box(f()?);
            }
        }
        let rounds = try_measure_rounds(&self.config.bench, f)?;
        self.record(name, rounds);
        Ok(())
    }

    fn start(&mut self, name: &str) {
        self.announce();
        tracing::debug!(
            bench = name,
            repeats = self.config.bench.repeats(),
            rounds = self.config.bench.rounds(),
            warmup = self.config.warmup_rounds,
            "starting benchmark"
        );
        for r in &self.reporters {
            r.bench_start(name);
        }
    }

    fn record(&mut self, name: &str, rounds: RoundResult) {
        // `rounds` always holds at least one entry
        let summary = match rounds.summary() {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(bench = name, error = %e, "no rounds recorded");
                return;
            }
        };

        let result = BenchResult {
            name: format!("{}/{}", self.suite, name),
            repeats: rounds.repeats(),
            round_us: rounds.into_vec(),
            summary,
        };
        tracing::info!(bench = %result.name, mean_us = result.summary.mean, "benchmark complete");

        for r in &self.reporters {
            r.bench_end(&result);
        }

        self.results.push(result);
    }

    /// Run multiple related benchmarks as a group.
    ///
    /// Groups are just for organization/reporting.
    pub fn group<F>(&mut self, group_name: &str, f: F)
    where
        F: FnOnce(&mut BenchGroup<'_>),
    {
        let mut group = BenchGroup {
            runner: self,
            prefix: group_name.to_string(),
        };
        f(&mut group);
    }

    /// Finish the suite and return its results.
    ///
    /// Reporters see the completed suite (JSON is written here) and any
    /// attached diagnostics are dumped.
    pub fn finish(mut self) -> SuiteResult {
        self.announce();
        let suite_result = SuiteResult {
            suite: self.suite,
            results: self.results,
            total_duration: self.suite_start.elapsed(),
            started_at: self.started_at,
            git_sha: self.config.git_sha,
            runtime: self.runtime,
            metadata: self.metadata,
        };

        for r in &self.reporters {
            r.suite_end(&suite_result);
        }

        if !self.diagnostics.is_empty() {
            let mut stderr = std::io::stderr().lock();
            if let Err(e) = diagnostics::dump_all(&self.diagnostics, &mut stderr) {
                tracing::warn!(error = %e, "failed to write diagnostics");
            }
        }

        suite_result
    }

    /// Finish and compare against a baseline file.
    ///
    /// Returns the suite and every benchmark more than `threshold` slower
    /// than its baseline counterpart, with the slowdown ratio.
    pub fn finish_with_baseline(
        self,
        baseline_path: impl AsRef<std::path::Path>,
        threshold: f64,
    ) -> std::io::Result<(SuiteResult, Vec<(BenchResult, f64)>)> {
        let baseline = SuiteResult::load(&baseline_path)?;
        let suite = self.finish();
        let regressions = suite
            .find_regressions(&baseline, threshold)
            .into_iter()
            .map(|(r, ratio)| (r.clone(), ratio))
            .collect();
        Ok((suite, regressions))
    }
}

/// A benchmark group for organizing related benchmarks.
pub struct BenchGroup<'a> {
    runner: &'a mut BenchRunner,
    prefix: String,
}

impl<'a> BenchGroup<'a> {
    /// Run a benchmark within this group.
    pub fn run<F, R>(&mut self, name: &str, f: F)
    where
        F: FnMut() -> R,
    {
        let full_name = format!("{}/{}", self.prefix, name);
        self.runner.run(&full_name, f);
    }

    /// Run a fallible benchmark within this group.
    pub fn try_run<F, R, E>(&mut self, name: &str, f: F) -> Result<(), E>
    where
        F: FnMut() -> Result<R, E>,
    {
        let full_name = format!("{}/{}", self.prefix, name);
        self.runner.try_run(&full_name, f)
    }
}

fn unix_millis() -> String {
    let duration = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}", duration.as_millis())
}
