//! Benchmark runner: parses arguments, runs the harness, writes the CSV.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use matbench::config::{
    DEFAULT_LANGUAGE, DEFAULT_N, DEFAULT_OUTPUT, DEFAULT_RUNS, DEFAULT_SEED, MIN_WARMUP,
};
use matbench::{BenchConfig, Benchmark, SystemProbe};
use tracing_subscriber::EnvFilter;

/// Time naive i-k-j matrix multiplication and record one CSV row per run
#[derive(Parser, Debug)]
#[command(name = "matbench")]
#[command(version)]
struct Args {
    /// Matrix dimension
    #[arg(long, default_value_t = DEFAULT_N)]
    n: usize,

    /// Number of measured runs
    #[arg(long, default_value_t = DEFAULT_RUNS)]
    runs: usize,

    /// Seed for A; B uses seed + 1
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Output CSV path
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    out: PathBuf,

    /// Value of the `language` column
    #[arg(long, default_value = DEFAULT_LANGUAGE)]
    language: String,

    /// Untimed warm-up invocations (at least 2)
    #[arg(long, default_value_t = MIN_WARMUP)]
    warmup: usize,
}

impl From<Args> for BenchConfig {
    fn from(args: Args) -> Self {
        Self {
            n: args.n,
            runs: args.runs,
            seed: args.seed,
            output: args.out,
            language: args.language,
            warmup: args.warmup,
        }
    }
}

fn main() -> Result<()> {
    // Logs go to stderr so they never end up in redirected results.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = BenchConfig::from(Args::parse());
    let output = config.output.clone();

    let records = Benchmark::new(config, SystemProbe::new())
        .context("refusing to start benchmark")?
        .run()
        .with_context(|| format!("benchmark aborted (output: {})", output.display()))?;

    println!("{} runs written to {}", records.len(), output.display());
    Ok(())
}
