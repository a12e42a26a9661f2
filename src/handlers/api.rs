//! Service-level endpoints: liveness, provider health, cache stats.

use axum::{extract::State, response::Json};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::core::tts::ProviderHealth;
use crate::state::AppState;

/// Handler for GET / - basic liveness probe.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "service": "agentwood-voice",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[derive(Debug, Serialize)]
pub struct ProviderHealthResponse {
    /// "healthy" when all engines respond, "degraded" when some do,
    /// "down" when none do
    pub status: &'static str,
    pub engines: Vec<ProviderHealth>,
}

/// Handler for GET /health/providers - probes every configured engine
/// concurrently and aggregates the result.
pub async fn provider_health(State(state): State<Arc<AppState>>) -> Json<ProviderHealthResponse> {
    let engines = state.registry.health_report().await;

    let healthy = engines.iter().filter(|h| h.healthy).count();
    let status = if engines.is_empty() || healthy == 0 {
        "down"
    } else if healthy == engines.len() {
        "healthy"
    } else {
        "degraded"
    };

    if status != "healthy" {
        tracing::warn!(status, healthy, total = engines.len(), "Provider health degraded");
    }

    Json(ProviderHealthResponse { status, engines })
}

/// Handler for GET /cache/stats.
pub async fn cache_stats(State(state): State<Arc<AppState>>) -> Json<Value> {
    let stats = state.cache.stats();
    Json(json!({ "cache": stats }))
}
