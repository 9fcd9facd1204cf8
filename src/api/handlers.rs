//! API Handlers
//!
//! HTTP request handlers for the peer protocol and the frontend endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::error::{CacheError, Result};
use crate::group::GroupRegistry;
use crate::models::{
    GroupStatsResponse, HealthResponse, PeerRequest, PeerResponse, StatsResponse, ValueResponse,
};
use crate::peers::{normalize_base_path, path, PoolOptions, WireCodec};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Groups served by this process
    pub registry: Arc<GroupRegistry>,
    /// This node's peer id, used in logs and stats
    pub node: String,
    /// Prefix of the peer protocol routes
    pub base_path: String,
    /// Encoding of peer responses
    pub codec: WireCodec,
}

impl AppState {
    /// Creates a new AppState with default peer options.
    pub fn new(registry: Arc<GroupRegistry>, node: impl Into<String>) -> Self {
        Self::with_options(registry, node, &PoolOptions::default())
    }

    /// Creates a new AppState whose peer endpoint matches the pool options.
    pub fn with_options(
        registry: Arc<GroupRegistry>,
        node: impl Into<String>,
        options: &PoolOptions,
    ) -> Self {
        Self {
            registry,
            node: node.into(),
            base_path: normalize_base_path(&options.base_path),
            codec: options.codec,
        }
    }
}

/// Handler for GET <base>/<group>/<key>
///
/// Serves another peer's request for a key owned by this process.
pub async fn peer_handler(State(state): State<AppState>, uri: Uri) -> Result<Response> {
    let req = path::decode(&state.base_path, uri.path())?;
    info!(node = %state.node, group = %req.group, key = %req.key, "GET from peer");

    let body = serve(&state, &req).await?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, state.codec.content_type())],
        body,
    )
        .into_response())
}

async fn serve(state: &AppState, req: &PeerRequest) -> Result<Vec<u8>> {
    let group = state
        .registry
        .get_group(&req.group)
        .ok_or_else(|| CacheError::NotFound(format!("no such group: {}", req.group)))?;

    let view = group.get(&req.key).await?;
    state.codec.encode(&PeerResponse::new(view.to_vec()))
}

/// Handler for GET /api/:group/:key
///
/// Looks a key up through the distributed cache and returns it as JSON.
pub async fn api_get_handler(
    State(state): State<AppState>,
    Path((group_name, key)): Path<(String, String)>,
) -> Result<Json<ValueResponse>> {
    let group = state
        .registry
        .get_group(&group_name)
        .ok_or_else(|| CacheError::NotFound(format!("no such group: {}", group_name)))?;

    let view = group.get(&key).await?;
    Ok(Json(ValueResponse::new(group_name, key, view.as_string())))
}

/// Handler for GET /stats
///
/// Returns statistics for every registered group.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let groups = state
        .registry
        .groups()
        .iter()
        .map(|g| GroupStatsResponse::new(g.name(), g.stats(), g.cache_stats()))
        .collect();

    Json(StatsResponse {
        node: state.node.clone(),
        groups,
    })
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
