//! The measurement protocol.
//!
//! 1. Generate A from `seed` and B from `seed + 1`.
//! 2. Open the sink and write the header.
//! 3. Warm up: run the kernel `warmup` times, results and timings discarded.
//! 4. For each run: sample, time one `multiply(A, B)`, sample again,
//!    combine the samples and write the row straight away.
//!
//! Everything is sequential on the calling thread. Any error aborts the
//! whole benchmark; rows already written stay intact.

use std::hint::black_box;
use std::io::Write;
use std::time::Instant;

use tracing::{debug, info, info_span};

use crate::config::BenchConfig;
use crate::error::Result;
use crate::matrix::random::operands;
use crate::matrix::{Matrix, naive_ikj::multiply};
use crate::metrics::{ResourceProbe, Sample, Sampler};
use crate::report::{CsvSink, RunRecord};

type Kernel = fn(&Matrix, &Matrix) -> Matrix;

/// A validated configuration bound to a resource probe.
#[derive(Debug)]
pub struct Benchmark<P> {
    config: BenchConfig,
    sampler: Sampler<P>,
    kernel: Kernel,
}

impl<P: ResourceProbe> Benchmark<P> {
    /// Fails with [`crate::ConfigError`] if the configuration is invalid.
    pub fn new(config: BenchConfig, probe: P) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            sampler: Sampler::new(probe),
            kernel: multiply,
        })
    }

    /// Runs the benchmark into the configured output file.
    pub fn run(self) -> Result<Vec<RunRecord>> {
        let span = info_span!("benchmark", n = self.config.n, runs = self.config.runs);
        let _enter = span.enter();

        let (a, b) = self.generate();
        let mut sink = CsvSink::create(&self.config.output)?;
        info!(output = %self.config.output.display(), "writing results");

        let records = self.measure(&a, &b, &mut sink)?;
        sink.finish()?;
        Ok(records)
    }

    /// Runs the benchmark into `sink`, which is flushed but left open.
    pub fn run_with_sink<W: Write>(self, sink: &mut CsvSink<W>) -> Result<Vec<RunRecord>> {
        let span = info_span!("benchmark", n = self.config.n, runs = self.config.runs);
        let _enter = span.enter();

        let (a, b) = self.generate();
        self.measure(&a, &b, sink)
    }

    fn generate(&self) -> (Matrix, Matrix) {
        let start = Instant::now();
        let (a, b) = operands(self.config.n, self.config.seed);
        debug!(
            seed = self.config.seed,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "generated operands"
        );
        (a, b)
    }

    fn measure<W: Write>(
        mut self,
        a: &Matrix,
        b: &Matrix,
        sink: &mut CsvSink<W>,
    ) -> Result<Vec<RunRecord>> {
        let BenchConfig {
            n,
            runs,
            warmup,
            ref language,
            ..
        } = self.config;

        sink.write_header()?;

        self.sampler.prime();
        for _ in 0..warmup {
            black_box((self.kernel)(black_box(a), black_box(b)));
        }
        debug!(warmup, "warm-up done");

        let flops = 2.0 * (n as f64).powi(3);
        let mut records = Vec::with_capacity(runs);
        let mut checksum = 0.0;

        for run in 1..=runs {
            let before = self.sampler.snapshot();

            let start = Instant::now();
            let c = black_box((self.kernel)(black_box(a), black_box(b)));
            let seconds = start.elapsed().as_secs_f64();

            let after = self.sampler.snapshot();
            checksum = c.checksum();
            drop(c);

            let record = RunRecord {
                language: language.clone(),
                n,
                run,
                seconds,
                memory_mb: Sample::high_water(before.memory_mb, after.memory_mb),
                cpu_percent: Sample::mean(before.cpu_percent, after.cpu_percent),
            };
            sink.write_record(&record)?;

            debug!(
                run,
                seconds,
                gflops = flops / seconds / 1e9,
                memory_mb = record.memory_mb.value(),
                cpu_percent = record.cpu_percent.value(),
                "run complete"
            );
            records.push(record);
        }

        log_summary(&records, flops, checksum);
        Ok(records)
    }
}

fn log_summary(records: &[RunRecord], flops: f64, checksum: f64) {
    let best = records
        .iter()
        .map(|r| r.seconds)
        .fold(f64::INFINITY, f64::min);
    let mean = records.iter().map(|r| r.seconds).sum::<f64>() / records.len() as f64;

    info!(
        runs = records.len(),
        best_seconds = best,
        mean_seconds = mean,
        best_gflops = flops / best / 1e9,
        checksum,
        "benchmark complete"
    );
}
