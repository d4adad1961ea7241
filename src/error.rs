//! Error types for the Makefile variable resolver.

use std::path::PathBuf;
use thiserror::Error;

fn format_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Errors raised while walking the include graph or expanding references
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Unresolved include {path:?} (from {included_from:?}, line {line})")]
    UnresolvedInclude {
        path: PathBuf,
        included_from: PathBuf,
        line: usize,
    },

    #[error("Cyclic include: {}", format_chain(.chain))]
    CyclicInclude { chain: Vec<PathBuf> },

    #[error("Cyclic reference while expanding {name}: {}", .chain.join(" -> "))]
    CyclicReference { name: String, chain: Vec<String> },

    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by the external Make evaluator and its scratch area
#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("Failed to spawn {program}: {message}")]
    Spawn { program: String, message: String },

    #[error("Make exited with status {status}: {stderr}")]
    Failed { status: i32, stderr: String },

    #[error("Make did not finish within {timeout_ms} ms")]
    TimedOut { timeout_ms: u64 },

    #[error("Scratch generation {generation} was collected by a newer refresh")]
    StaleGeneration { generation: u64 },

    #[error("Scratch I/O error: {0}")]
    Scratch(#[from] std::io::Error),
}

/// Top-level errors surfaced by sessions and the CLI
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Resolution failed: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Evaluator failed: {0}")]
    Evaluator(#[from] EvaluatorError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to render output: {0}")]
    Output(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
