//! Model errors

use std::path::PathBuf;
use thiserror::Error;

/// Failure to load or validate a model bundle
#[derive(Debug, Error)]
pub enum BundleError {
    #[error("failed to read model bundle {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model bundle: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid model bundle: {0}")]
    Invalid(String),
}

/// Failure inside the scale / predict path
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PredictionError {
    #[error("{stage} expects {expected} features, got {actual}")]
    DimensionMismatch {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("could not shape input row: {0}")]
    Shape(String),

    #[error("malformed decision tree {tree}: {reason}")]
    MalformedTree { tree: usize, reason: String },

    #[error("invalid probabilities: {0}")]
    InvalidProbabilities(String),

    #[error("predicted class {0} is not one of the model classes")]
    UnknownClass(i64),
}
