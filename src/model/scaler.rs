//! Fitted feature scalers
//!
//! Mirrors the transforms of scikit-learn's `StandardScaler` and
//! `MinMaxScaler`, using the parameters exported at training time.

use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use super::error::{BundleError, PredictionError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scaler {
    /// `(x - mean) / scale`
    Standard { mean: Vec<f64>, scale: Vec<f64> },

    /// `x * scale + min`
    MinMax { min: Vec<f64>, scale: Vec<f64> },
}

impl Scaler {
    /// Number of features the scaler was fitted on
    pub fn n_features(&self) -> usize {
        match self {
            Scaler::Standard { mean, .. } => mean.len(),
            Scaler::MinMax { min, .. } => min.len(),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), BundleError> {
        let (offset, scale, divides) = match self {
            Scaler::Standard { mean, scale } => (mean, scale, true),
            Scaler::MinMax { min, scale } => (min, scale, false),
        };

        if offset.len() != scale.len() {
            return Err(BundleError::Invalid(format!(
                "scaler has {} offsets but {} scale factors",
                offset.len(),
                scale.len()
            )));
        }
        if offset.iter().chain(scale.iter()).any(|v| !v.is_finite()) {
            return Err(BundleError::Invalid("scaler parameters must be finite".to_string()));
        }
        if divides && scale.iter().any(|s| *s == 0.0) {
            return Err(BundleError::Invalid("standard scaler has a zero scale factor".to_string()));
        }
        Ok(())
    }

    /// Transform rows of raw features into the model's input space
    pub fn transform(&self, rows: &Array2<f64>) -> Result<Array2<f64>, PredictionError> {
        if rows.ncols() != self.n_features() {
            return Err(PredictionError::DimensionMismatch {
                stage: "scaler",
                expected: self.n_features(),
                actual: rows.ncols(),
            });
        }

        let scaled = match self {
            Scaler::Standard { mean, scale } => {
                let mean = ArrayView1::from(mean.as_slice());
                let scale = ArrayView1::from(scale.as_slice());
                (rows - &mean) / &scale
            }
            Scaler::MinMax { min, scale } => {
                let min = ArrayView1::from(min.as_slice());
                let scale = ArrayView1::from(scale.as_slice());
                rows * &scale + &min
            }
        };

        Ok(scaled)
    }
}
