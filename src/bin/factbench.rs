//! factbench: time factorial implementations from the command line.
//!
//! ```text
//! factbench run                          # fac_rec(100), 30000 calls × 10 rounds
//! factbench run --variant iter --variant rec --n 500 --rounds 5
//! factbench run --baseline target/factbench/factorial.json
//! factbench sweep --sizes 10,100,1000 --reps 10
//! factbench list
//! ```

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use factbench::{
    group_thousands, register_workloads, time_batch, BenchRunner, ConsoleReporter, JsonReporter,
    Reporter, RunnerConfig, RuntimeInfo, Variant, WorkloadListing,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "factbench",
    version,
    about = "Micro-benchmark iterative, while-loop and recursive factorials"
)]
struct Cli {
    /// Verbose output (per-round timings, debug logging)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Quiet mode (minimal output, only errors)
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    /// Stack size in MiB for the benchmark thread (deep recursion needs more)
    #[arg(long, global = true, default_value_t = 256)]
    stack_size_mib: usize,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Time workloads over repeated rounds and report mean/stdev
    Run(RunArgs),
    /// Compare iterative and recursive factorial over a range of sizes
    Sweep(SweepArgs),
    /// List the available factorial variants
    List,
}

#[derive(Debug, Parser)]
struct RunArgs {
    /// Factorial argument
    #[arg(long, default_value_t = 100)]
    n: u32,

    /// Variant(s) to benchmark
    #[arg(long, value_enum, default_values_t = [Variant::Rec])]
    variant: Vec<Variant>,

    /// Workload calls per round [env: BENCH_REPEATS]
    #[arg(long, allow_negative_numbers = true)]
    repeats: Option<i64>,

    /// Timed rounds [env: BENCH_ROUNDS]
    #[arg(long, allow_negative_numbers = true)]
    rounds: Option<i64>,

    /// Warmup rounds (discarded) [env: BENCH_WARMUP]
    #[arg(long)]
    warmup: Option<usize>,

    /// Recursion bound for fac_rec (default: n + 50)
    #[arg(long)]
    max_depth: Option<u32>,

    /// Only run benchmarks whose name contains this
    #[arg(long)]
    filter: Option<String>,

    /// Output directory for JSON results [env: BENCH_OUTPUT_DIR]
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Don't write JSON results
    #[arg(long)]
    no_json: bool,

    /// Baseline JSON file for regression comparison
    #[arg(long)]
    baseline: Option<PathBuf>,

    /// Regression threshold (default: 5%)
    #[arg(long, default_value_t = 0.05)]
    threshold: f64,

    /// Print what each variant computes after the run
    #[arg(long)]
    describe: bool,
}

#[derive(Debug, Parser)]
struct SweepArgs {
    /// Factorial arguments to compare
    #[arg(
        long,
        value_delimiter = ',',
        default_values_t = [10, 100, 500, 1000, 2000, 10000, 20000, 30000, 50000]
    )]
    sizes: Vec<u32>,

    /// Calls per size and variant
    #[arg(long, default_value_t = 10)]
    reps: u64,
}

// ============================================================================
// Verbosity Control
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    fn from_cli(cli: &Cli) -> Self {
        if cli.quiet {
            Verbosity::Quiet
        } else if cli.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }

    fn is_normal(&self) -> bool {
        *self != Verbosity::Quiet
    }

    fn is_verbose(&self) -> bool {
        *self == Verbosity::Verbose
    }

    fn default_filter(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "factbench=debug",
        }
    }
}

fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.default_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> Result<()> {
    let cli = Cli::parse();
    let verbosity = Verbosity::from_cli(&cli);
    init_tracing(verbosity);

    // Recursion depth is bounded per call; the stack that has to hold those
    // frames is sized here, for this one thread.
    let handle = std::thread::Builder::new()
        .name("factbench".to_string())
        .stack_size(stack_bytes(cli.stack_size_mib)?)
        .spawn(move || dispatch(cli.cmd, verbosity))
        .context("Failed to spawn benchmark thread")?;

    let exit_code = handle
        .join()
        .map_err(|_| anyhow!("benchmark thread panicked"))??;
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

fn stack_bytes(mib: usize) -> Result<usize> {
    mib.checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow!("--stack-size-mib {} is too large", mib))
}

fn dispatch(cmd: Commands, verbosity: Verbosity) -> Result<i32> {
    match cmd {
        Commands::Run(args) => run(args, verbosity),
        Commands::Sweep(args) => sweep(args, verbosity),
        Commands::List => {
            list();
            Ok(0)
        }
    }
}

// ============================================================================
// run
// ============================================================================

fn build_config(args: &RunArgs, verbosity: Verbosity) -> Result<RunnerConfig> {
    let mut config = RunnerConfig::from_env().context("Invalid BENCH_* environment")?;

    if let Some(r) = args.repeats {
        config.bench = config.bench.with_repeats(r)?;
    }
    if let Some(r) = args.rounds {
        config.bench = config.bench.with_rounds(r)?;
    }
    if let Some(w) = args.warmup {
        config.warmup_rounds = w;
    }
    if let Some(f) = &args.filter {
        config.filter = Some(f.clone());
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    config.verbose = verbosity.is_normal();

    Ok(config)
}

fn run(args: RunArgs, verbosity: Verbosity) -> Result<i32> {
    let config = build_config(&args, verbosity)?;
    let max_depth = args.max_depth.unwrap_or(args.n.saturating_add(50));

    let mut reporters: Vec<Box<dyn Reporter>> = Vec::new();
    if verbosity.is_normal() {
        reporters.push(Box::new(
            ConsoleReporter::new().show_all_rounds(verbosity.is_verbose()),
        ));
    }
    if !args.no_json {
        reporters.push(Box::new(JsonReporter::new(config.output_dir.clone())));
    }

    let mut runner = BenchRunner::with_config("factorial", config);
    runner.reporters(reporters);
    runner.metadata("n", args.n.to_string());
    runner.metadata("max_depth", max_depth.to_string());
    if args.describe {
        runner.add_diagnostic(Box::new(WorkloadListing::new(
            &args.variant,
            args.n,
            max_depth,
        )));
    }

    register_workloads(&mut runner, &args.variant, args.n, max_depth)
        .with_context(|| format!("Workload failed for n = {}", args.n))?;

    let Some(baseline) = args.baseline else {
        let suite = runner.finish();
        if suite.results.is_empty() && verbosity.is_normal() {
            eprintln!("⚠️  No benchmarks matched the filter");
        }
        return Ok(0);
    };

    let (_suite, regressions) = runner
        .finish_with_baseline(&baseline, args.threshold)
        .with_context(|| format!("Failed to load baseline {}", baseline.display()))?;

    if regressions.is_empty() {
        if verbosity.is_normal() {
            eprintln!("\n✅ No regressions against {}", baseline.display());
        }
        return Ok(0);
    }

    eprintln!("\n❌ {} regression(s) detected!", regressions.len());
    for (result, ratio) in &regressions {
        let pct = (ratio - 1.0) * 100.0;
        eprintln!("  {} is {:.1}% slower", result.name, pct);
    }
    Ok(1)
}

// ============================================================================
// sweep
// ============================================================================

fn sweep(args: SweepArgs, verbosity: Verbosity) -> Result<i32> {
    if args.reps == 0 {
        return Err(anyhow!("--reps must be positive"));
    }
    if verbosity.is_normal() {
        println!("{}", RuntimeInfo::current());
    }

    for &n in &args.sizes {
        let max_depth = n.saturating_add(50);
        let t_iter = time_batch(args.reps, || Variant::Iter.compute(n, max_depth))?;
        let t_rec = time_batch(args.reps, || Variant::Rec.compute(n, max_depth))
            .with_context(|| format!("fac_rec({n}) failed"))?;

        tracing::debug!(n, iter_s = t_iter.as_secs_f64(), rec_s = t_rec.as_secs_f64());
        println!(
            "n={:<6}  reps={:<4}  iter: {:.6}s   rec: {:.6}s",
            n,
            args.reps,
            t_iter.as_secs_f64(),
            t_rec.as_secs_f64()
        );
    }

    if verbosity.is_verbose() {
        let total: u64 = args.sizes.len() as u64 * args.reps * 2;
        eprintln!("{} calls total", group_thousands(total));
    }
    Ok(0)
}

// ============================================================================
// list
// ============================================================================

fn list() {
    for v in Variant::ALL {
        println!("{:<10} {}", v.fn_name(), v.description());
    }
}
