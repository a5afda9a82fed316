use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BenchError>;

/// Invalid benchmark configuration. Always reported before any work starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("matrix dimension n must be at least 1")]
    ZeroDimension,
    #[error("runs must be at least 1")]
    ZeroRuns,
    #[error("warmup must be at least {min}, got {got}")]
    TooFewWarmups { min: usize, got: usize },
    #[error("language label must not be empty")]
    EmptyLanguage,
    #[error("language label {0:?} contains a CSV delimiter, quote or line break")]
    InvalidLanguage(String),
}

/// Fatal benchmark failure. There is no retry: the run is aborted.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("error creating output file {path:?}: {err}")]
    CreateOutput {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },
    #[error("error writing benchmark results: {err}")]
    Write {
        #[source]
        err: std::io::Error,
    },
}
