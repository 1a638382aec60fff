//! Health check endpoints

use crate::backend::ServiceName;
use crate::server::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Serialize, Deserialize)]
pub struct ReadyResponse {
    pub status: String,
    pub services: Vec<ServiceName>,
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness check endpoint
///
/// Backend channels are opened before the listener binds, so a serving
/// gateway is connected to every service it lists.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    Json(ReadyResponse {
        status: "ready".to_string(),
        services: state.services.clone(),
    })
}
