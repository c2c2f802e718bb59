//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

use crate::inference::ClassifyError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    /// No model bundle; carries the client-facing message
    ModelUnavailable(String),

    /// Unparseable input or a failure in the scale / predict path
    Prediction(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ModelUnavailable(msg) => {
                tracing::error!("Prediction requested without a model: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            AppError::Prediction(msg) => {
                tracing::warn!("Prediction rejected: {}", msg);
                (StatusCode::BAD_REQUEST, format!("Error making prediction: {}", msg))
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<ClassifyError> for AppError {
    fn from(err: ClassifyError) -> Self {
        match err {
            ClassifyError::ModelUnavailable { .. } => AppError::ModelUnavailable(err.to_string()),
            ClassifyError::InvalidInput { .. } | ClassifyError::PredictionFailure(_) => {
                AppError::Prediction(err.to_string())
            }
        }
    }
}
