//! Peer Cache - A peer-distributed in-process cache
//!
//! Runs one cache node serving a demo group backed by a slow in-memory
//! "database". Start several nodes with the same `PEERS` list to form a
//! cluster.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use peer_cache::api::create_router;
use peer_cache::{loader_fn, AppState, Config, GroupRegistry, HttpPool};

/// Main entry point for a Peer Cache node.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Register the demo group with its loader
/// 4. Configure the static peer set and attach it to the groups
/// 5. Start HTTP server on configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "peer_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Peer Cache node");

    let config = Config::from_env();
    info!(
        "Configuration loaded: self={}, peers={:?}, cache_bytes={}, port={}, codec={}",
        config.self_url, config.peers, config.cache_bytes, config.server_port, config.codec
    );

    let registry = Arc::new(GroupRegistry::new());
    registry.create_group(&config.group_name, config.cache_bytes, slow_db_loader())?;

    let pool = Arc::new(HttpPool::new(&config.self_url, config.pool_options()));
    pool.set_peers(config.peers.clone());
    registry.register_peers(pool.clone())?;

    let state = AppState::with_options(registry, pool.self_id(), pool.options());
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Loader standing in for a slow source of truth.
fn slow_db_loader() -> impl peer_cache::Loader {
    let db: Arc<HashMap<&'static str, &'static str>> =
        Arc::new(HashMap::from([("Tom", "630"), ("Jack", "589"), ("Sam", "567")]));

    loader_fn(move |key: String| {
        let db = db.clone();
        async move {
            info!("[SlowDB] search key {}", key);
            tokio::time::sleep(Duration::from_millis(100)).await;
            db.get(key.as_str())
                .map(|v| v.as_bytes().to_vec())
                .with_context(|| format!("{} not exist", key))
        }
    })
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
