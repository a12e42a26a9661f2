use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers::{api, speak, voices};
use crate::state::AppState;
use std::sync::Arc;

/// Create the API router with protected routes
///
/// Note: Authentication middleware should be applied in main.rs after state is available
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Protected routes (auth required when AUTH_REQUIRED=true)
        .route("/voices", get(voices::list_voices))
        .route("/voices/{name}", get(voices::get_voice))
        .route("/speak", post(speak::speak_handler))
        .route("/health/providers", get(api::provider_health))
        .route("/cache/stats", get(api::cache_stats))
        .layer(TraceLayer::new_for_http())
}
