//! Model bundle: fitted classifier + scaler + ordered feature names

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::classifier::Classifier;
use super::error::BundleError;
use super::scaler::Scaler;

/// Diagnosis returned to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Diagnosis {
    Benign,
    Malignant,
}

impl Diagnosis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Diagnosis::Benign => "Benign",
            Diagnosis::Malignant => "Malignant",
        }
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label encoding used at training time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelMap {
    /// Class label encoded as benign; every other class is malignant
    #[serde(default = "default_benign_class")]
    pub benign_class: i64,
}

fn default_benign_class() -> i64 {
    1
}

impl Default for LabelMap {
    fn default() -> Self {
        Self { benign_class: default_benign_class() }
    }
}

impl LabelMap {
    pub fn diagnose(&self, class: i64) -> Diagnosis {
        if class == self.benign_class {
            Diagnosis::Benign
        } else {
            Diagnosis::Malignant
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawBundle {
    features: Vec<String>,
    scaler: Scaler,
    model: Classifier,
    #[serde(default)]
    labels: LabelMap,
}

/// Immutable, validated model bundle
#[derive(Debug, Clone)]
pub struct ModelBundle {
    features: Vec<String>,
    scaler: Scaler,
    model: Classifier,
    labels: LabelMap,
    checksum: String,
}

impl ModelBundle {
    /// Read, checksum and validate a bundle artifact
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BundleError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| BundleError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let bundle = Self::from_slice(&bytes)?;

        tracing::info!("Model loaded successfully from {}", path.display());
        tracing::info!("Features: {:?}", bundle.features);
        tracing::info!("Model bundle sha256: {}", bundle.checksum());

        Ok(bundle)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, BundleError> {
        let raw: RawBundle = serde_json::from_slice(bytes)?;
        let checksum = format!("{:x}", Sha256::digest(bytes));

        let bundle = Self {
            features: raw.features,
            scaler: raw.scaler,
            model: raw.model,
            labels: raw.labels,
            checksum,
        };
        bundle.validate()?;
        Ok(bundle)
    }

    fn validate(&self) -> Result<(), BundleError> {
        if self.features.is_empty() {
            return Err(BundleError::Invalid("feature list is empty".to_string()));
        }
        for (i, name) in self.features.iter().enumerate() {
            if self.features[..i].contains(name) {
                return Err(BundleError::Invalid(format!("duplicate feature '{}'", name)));
            }
        }

        self.scaler.validate()?;
        self.model.validate()?;

        let n = self.features.len();
        if self.scaler.n_features() != n {
            return Err(BundleError::Invalid(format!(
                "scaler was fitted on {} features, bundle lists {}",
                self.scaler.n_features(),
                n
            )));
        }
        if self.model.n_features() != n {
            return Err(BundleError::Invalid(format!(
                "classifier was fitted on {} features, bundle lists {}",
                self.model.n_features(),
                n
            )));
        }
        Ok(())
    }

    /// Ordered feature names; also the column order of the input row
    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn scaler(&self) -> &Scaler {
        &self.scaler
    }

    pub fn model(&self) -> &Classifier {
        &self.model
    }

    pub fn labels(&self) -> &LabelMap {
        &self.labels
    }

    /// Hex SHA-256 of the artifact bytes
    pub fn checksum(&self) -> &str {
        &self.checksum
    }
}
