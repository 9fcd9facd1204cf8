//! API Module
//!
//! HTTP handlers and routing for the peer protocol and the frontend API.
//!
//! # Endpoints
//! - `GET <base>/*path` - Serve a value to another peer (`*path` = `<group>/<key>`, escaped)
//! - `GET /api/:group/:key` - Look a key up through the cluster
//! - `GET /stats` - Per-group statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
