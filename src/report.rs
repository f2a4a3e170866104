//! Pluggable reporters for benchmark output.

use crate::config::RunnerConfig;
use crate::result::{BenchResult, RuntimeInfo, SuiteResult};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Trait for benchmark result reporters.
pub trait Reporter: Send + Sync {
    /// Called when a suite starts.
    fn suite_start(&self, _suite: &str, _config: &RunnerConfig, _runtime: &RuntimeInfo) {}

    /// Called when a benchmark starts.
    fn bench_start(&self, _name: &str) {}

    /// Called when a benchmark completes.
    fn bench_end(&self, _result: &BenchResult) {}

    /// Called when a suite completes.
    fn suite_end(&self, _result: &SuiteResult) {}
}

/// Console reporter that prints results to stderr.
pub struct ConsoleReporter {
    show_all_rounds: bool,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self {
            show_all_rounds: false,
        }
    }

    /// Show individual round averages (not just the summary).
    pub fn show_all_rounds(mut self, show: bool) -> Self {
        self.show_all_rounds = show;
        self
    }

    /// Lines printed for a finished benchmark.
    fn summary_lines(result: &BenchResult) -> Vec<String> {
        let label = result
            .name
            .rsplit_once('/')
            .map(|(_, short)| short)
            .unwrap_or(&result.name);

        let mut lines = vec![
            format!(
                "Ran {} {} times × {} rounds = {} calls",
                label,
                result.repeats,
                result.rounds(),
                group_thousands(result.total_calls())
            ),
            format!("Mean:  {:.2} µs per {}", result.summary.mean, label),
        ];
        match result.summary.stdev() {
            Ok(stdev) => lines.push(format!("Stdev: {:.2} µs", stdev)),
            Err(_) => lines.push("Stdev: n/a (needs at least 2 rounds)".to_string()),
        }
        lines
    }

    /// Individual round averages plus the relative spread, for verbose output.
    fn rounds_line(result: &BenchResult) -> Option<String> {
        if result.round_us.len() < 2 {
            return None;
        }
        let rounds: Vec<_> = result
            .round_us
            .iter()
            .map(|us| format!("{:.2}µs", us))
            .collect();
        let mut line = format!("rounds: [{}]", rounds.join(", "));
        if let Some(spread) = result.summary.relative_spread() {
            line.push_str(&format!(" (spread {:.1}%)", spread * 100.0));
        }
        Some(line)
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for ConsoleReporter {
    fn suite_start(&self, suite: &str, config: &RunnerConfig, runtime: &RuntimeInfo) {
        eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        eprintln!("  Benchmark Suite: {}", suite);
        eprintln!("  Runtime: {}", runtime);
        eprintln!(
            "  Repeats: {}, Rounds: {}, Warmup: {}",
            config.bench.repeats(),
            config.bench.rounds(),
            config.warmup_rounds
        );
        eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }

    fn bench_start(&self, name: &str) {
        eprintln!("  {} ...", name);
        std::io::stderr().flush().ok();
    }

    fn bench_end(&self, result: &BenchResult) {
        for line in Self::summary_lines(result) {
            eprintln!("    {}", line);
        }

        if self.show_all_rounds {
            if let Some(line) = Self::rounds_line(result) {
                eprintln!("    {}", line);
            }
        }
    }

    fn suite_end(&self, result: &SuiteResult) {
        eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        eprintln!(
            "  Completed {} benchmarks in {:.2}s",
            result.results.len(),
            result.total_duration.as_secs_f64()
        );
        eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }
}

/// Format an integer with `,` thousands separators.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// JSON reporter that writes results to a file.
pub struct JsonReporter {
    output_dir: PathBuf,
}

impl JsonReporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl Reporter for JsonReporter {
    fn suite_end(&self, result: &SuiteResult) {
        match write_json_results(&self.output_dir, result) {
            Ok(path) => tracing::info!(path = %path.display(), "results written"),
            Err(e) => tracing::warn!(error = %e, "failed to write JSON results"),
        }
    }
}

/// Write `<output_dir>/<suite>.json`, returning the path written.
pub fn write_json_results(output_dir: &Path, result: &SuiteResult) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;

    let filename = format!("{}.json", result.suite.replace('/', "_"));
    let path = output_dir.join(&filename);

    let json = serde_json::to_string_pretty(result).map_err(std::io::Error::other)?;

    std::fs::write(&path, json)?;
    Ok(path)
}
