//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub cached_sessions: usize,
    pub vendors: Vec<String>,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        cached_sessions: state.cache.len().await,
        vendors: state
            .factory
            .vendors()
            .into_iter()
            .map(|vendor| vendor.as_str().to_string())
            .collect(),
    })
}
