//! Benchmark configuration.

use std::path::PathBuf;

use crate::error::ConfigError;

pub const DEFAULT_N: usize = 512;
pub const DEFAULT_RUNS: usize = 5;
pub const DEFAULT_SEED: u64 = 123;
pub const DEFAULT_OUTPUT: &str = "results/rust.csv";
pub const DEFAULT_LANGUAGE: &str = "rust";

/// Warm-up invocations every implementation performs before measuring.
pub const MIN_WARMUP: usize = 2;

/// Parameters of one benchmark execution. Fixed once the driver starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BenchConfig {
    /// Matrix dimension.
    pub n: usize,
    /// Number of measured runs.
    pub runs: usize,
    /// A is generated from `seed`, B from `seed + 1`.
    pub seed: u64,
    /// CSV destination.
    pub output: PathBuf,
    /// Value of the `language` column.
    pub language: String,
    /// Untimed kernel invocations before the first measured run.
    pub warmup: usize,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            n: DEFAULT_N,
            runs: DEFAULT_RUNS,
            seed: DEFAULT_SEED,
            output: PathBuf::from(DEFAULT_OUTPUT),
            language: DEFAULT_LANGUAGE.to_string(),
            warmup: MIN_WARMUP,
        }
    }
}

impl BenchConfig {
    /// Checks every field, returning the first problem found.
    ///
    /// ```
    /// use matbench::{BenchConfig, ConfigError};
    ///
    /// assert!(BenchConfig::default().validate().is_ok());
    ///
    /// let config = BenchConfig { n: 0, ..BenchConfig::default() };
    /// assert_eq!(config.validate(), Err(ConfigError::ZeroDimension));
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n == 0 {
            return Err(ConfigError::ZeroDimension);
        }
        if self.runs == 0 {
            return Err(ConfigError::ZeroRuns);
        }
        if self.warmup < MIN_WARMUP {
            return Err(ConfigError::TooFewWarmups {
                min: MIN_WARMUP,
                got: self.warmup,
            });
        }
        if self.language.is_empty() {
            return Err(ConfigError::EmptyLanguage);
        }
        if self
            .language
            .contains(|c| matches!(c, ',' | '"' | '\n' | '\r'))
        {
            return Err(ConfigError::InvalidLanguage(self.language.clone()));
        }
        Ok(())
    }
}
