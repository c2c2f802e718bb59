//! Inference: request-side feature handling and the classify / health operations

pub mod error;
pub mod input;
pub mod service;

pub use error::ClassifyError;
pub use input::RawInputs;
pub use service::{HealthStatus, InferenceService};
