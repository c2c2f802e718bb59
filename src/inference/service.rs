//! Inference service: owns the bundle and answers classify / health

use ndarray::Array2;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::config::Config;
use crate::model::{Diagnosis, ModelBundle, PredictionError};

use super::error::ClassifyError;
use super::input::{ordered_values, RawInputs};

/// Result of one classification
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub prediction: Diagnosis,
    /// Probability of the predicted class, in percent
    pub confidence: f64,
    /// Values actually fed to the scaler, in feature order
    pub input_features: FeatureEcho,
}

impl Classification {
    /// Confidence as shown to clients, two decimals
    pub fn confidence_label(&self) -> String {
        format!("{:.2}", self.confidence)
    }
}

/// Ordered name -> value pairs, serialized as a JSON object in feature order
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureEcho(pub Vec<(String, f64)>);

impl Serialize for FeatureEcho {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub model_loaded: bool,
}

/// Read-only after construction; shared across requests behind an `Arc`
#[derive(Debug)]
pub struct InferenceService {
    bundle: Option<ModelBundle>,
    artifact: String,
}

impl InferenceService {
    pub fn new(bundle: Option<ModelBundle>, artifact: impl Into<String>) -> Self {
        Self {
            bundle,
            artifact: artifact.into(),
        }
    }

    /// Load the configured bundle. A failed load is logged and leaves the
    /// service in degraded mode instead of aborting startup.
    pub fn load(config: &Config) -> Self {
        let bundle = match ModelBundle::load(&config.model_path) {
            Ok(bundle) => Some(bundle),
            Err(e) => {
                tracing::error!("Error loading model: {}", e);
                tracing::warn!("Serving without a model; /predict will answer 500");
                None
            }
        };
        Self::new(bundle, config.model_file_name())
    }

    pub fn is_loaded(&self) -> bool {
        self.bundle.is_some()
    }

    /// Feature names for the input form, if a model is loaded
    pub fn feature_list(&self) -> Option<&[String]> {
        self.bundle.as_ref().map(|b| b.features())
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            status: "healthy",
            model_loaded: self.is_loaded(),
        }
    }

    /// The loaded bundle, or `ModelUnavailable`
    pub fn require_model(&self) -> Result<&ModelBundle, ClassifyError> {
        self.bundle.as_ref().ok_or_else(|| ClassifyError::ModelUnavailable {
            artifact: self.artifact.clone(),
        })
    }

    pub fn classify(&self, raw: &RawInputs) -> Result<Classification, ClassifyError> {
        let bundle = self.require_model()?;

        let values = ordered_values(bundle.features(), raw)?;
        let row = Array2::from_shape_vec((1, values.len()), values.clone())
            .map_err(|e| PredictionError::Shape(e.to_string()))?;

        let scaled = bundle.scaler().transform(&row)?;
        let model = bundle.model();

        let class = model
            .predict(&scaled)?
            .first()
            .copied()
            .ok_or_else(|| PredictionError::InvalidProbabilities("no prediction returned".to_string()))?;
        let proba = model.predict_proba(&scaled)?;
        let index = model.class_index(class)?;
        let probability = proba
            .get((0, index))
            .copied()
            .ok_or_else(|| PredictionError::InvalidProbabilities(format!("no probability for class {}", class)))?;

        let prediction = bundle.labels().diagnose(class);
        let confidence = probability * 100.0;
        tracing::debug!("Prediction: {} (class {}, {:.2}%)", prediction, class, confidence);

        let input_features = bundle
            .features()
            .iter()
            .cloned()
            .zip(values)
            .collect();

        Ok(Classification {
            prediction,
            confidence,
            input_features: FeatureEcho(input_features),
        })
    }
}
