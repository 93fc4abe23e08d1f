use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};

use crate::main_lib::AppState;
use crate::models::{HealthResponse, ServiceInfo};

const SERVICE_NAME: &str = "QuoteDesk Market Data Service";

/// Liveness probe; 200 whenever the process is up.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Service metadata for the root path.
async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        api: "/api/v1",
        health: "/health",
    })
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/", get(root))
}
