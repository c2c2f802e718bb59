//! Model bundle and the fitted estimators inside it

pub mod bundle;
pub mod classifier;
pub mod error;
pub mod scaler;

pub use bundle::{Diagnosis, ModelBundle};
pub use error::PredictionError;
