//! Health check handler

use axum::{extract::State, Json};

use crate::AppState;
use crate::inference::HealthStatus;

pub async fn check(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(state.service.health())
}
