//! Shared test fixtures

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{response::Response, Router};

use crate::config::DEFAULT_MODEL_PATH;
use crate::inference::InferenceService;
use crate::model::ModelBundle;
use crate::{create_router, AppState};

/// Feature order of the shipped demo bundle
pub const FEATURES: [&str; 5] = [
    "mean radius",
    "mean texture",
    "mean perimeter",
    "mean area",
    "mean smoothness",
];

pub fn shipped_bundle_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_MODEL_PATH)
}

pub fn shipped_bundle() -> ModelBundle {
    ModelBundle::load(shipped_bundle_path()).unwrap()
}

pub fn app_with_model() -> Router {
    create_router(AppState {
        service: Arc::new(InferenceService::new(Some(shipped_bundle()), "breast_cancer_model.json")),
    })
}

pub fn app_without_model() -> Router {
    create_router(AppState {
        service: Arc::new(InferenceService::new(None, "breast_cancer_model.json")),
    })
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}
