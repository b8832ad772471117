//! Health check endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub products: usize,
    pub shipping_types: usize,
}

/// GET /health: liveness plus a glance at the loaded catalog.
pub async fn check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        products: state.catalog.read().await.len(),
        shipping_types: state.shipping.list_available_shipping_type().len(),
    })
}
