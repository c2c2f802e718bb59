//! Classification errors

use thiserror::Error;

use crate::model::PredictionError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClassifyError {
    /// No bundle was loaded at startup
    #[error("Model not loaded. Please ensure {artifact} exists in the model directory.")]
    ModelUnavailable { artifact: String },

    /// A submitted value is not a finite number
    #[error("could not convert value of '{field}' to float: '{value}'")]
    InvalidInput { field: String, value: String },

    /// Failure inside the scale / predict path
    #[error(transparent)]
    PredictionFailure(#[from] PredictionError),
}
