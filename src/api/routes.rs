//! API Routes
//!
//! Configures the Axum router with the peer protocol and frontend endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{api_get_handler, health_handler, peer_handler, stats_handler, AppState};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET <base>/*path` - Peer protocol, `*path` = escaped `<group>/<key>` (codec-encoded value)
/// - `GET /api/:group/:key` - Frontend lookup (JSON)
/// - `GET /stats` - Per-group statistics
/// - `GET /health` - Health check endpoint
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // The wildcard keeps the raw path so malformed requests reach the
    // path decoder instead of falling through to a bare 404.
    let peer_route = format!("{}/*path", state.base_path.trim_end_matches('/'));

    Router::new()
        .route(&peer_route, get(peer_handler))
        .route("/api/:group/:key", get(api_get_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
