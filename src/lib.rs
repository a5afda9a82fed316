//! Dense matrix multiplication benchmark harness.
//!
//! Times a naive i-k-j triple loop over two seeded random `n × n`
//! matrices and writes one CSV row per run, in the same format as the
//! C++, Java and Python versions of this benchmark, so results from all
//! of them can be compared side by side.
//!
//! ## Usage
//!
//! ```
//! use matbench::{Benchmark, BenchConfig, CsvSink, UnavailableProbe};
//!
//! let config = BenchConfig { n: 16, runs: 3, ..BenchConfig::default() };
//! let mut sink = CsvSink::new(Vec::new());
//!
//! let records = Benchmark::new(config, UnavailableProbe)?.run_with_sink(&mut sink)?;
//! assert_eq!(records.len(), 3);
//!
//! let csv = String::from_utf8(sink.finish()?).unwrap();
//! assert!(csv.starts_with("language,n,run,seconds,memory_mb,cpu_percent\n"));
//! # Ok::<(), matbench::BenchError>(())
//! ```
//!
//! ## What's inside
//!
//! - `rng`: MT19937-64, so a seed means the same matrix in every language
//! - `matrix`: the `Matrix` type, the generator and the i-k-j kernel
//! - `metrics`: best-effort memory / CPU sampling behind a probe trait
//! - `report`: run records and the CSV sink
//! - `driver`: warm-up, timed runs, sampling and output

pub mod config;
pub mod driver;
pub mod error;
pub mod matrix;
pub mod metrics;
pub mod report;
pub mod rng;

pub use config::BenchConfig;
pub use driver::Benchmark;
pub use error::{BenchError, ConfigError};
pub use matrix::Matrix;
pub use matrix::naive_ikj::{matmul_ikj, multiply};
pub use matrix::random::random_matrix;
pub use metrics::{ResourceProbe, Sample, SystemProbe, UnavailableProbe};
pub use report::{CsvSink, RunRecord};
