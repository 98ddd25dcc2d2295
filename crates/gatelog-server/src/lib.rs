//! HTTP server wiring for the gatelog JSON API.
//!
//! Mounts [`gatelog_api::api_router`] under `/api` behind HTTP Basic auth,
//! backed by the SQLite store.

pub mod auth;
pub mod error;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, middleware};
use gatelog_store_sqlite::SqliteStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::AuthConfig;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub store_path:         PathBuf,
  pub auth_username:      String,
  pub auth_password_hash: String,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router: `/api/...` behind Basic auth, with
/// request tracing outermost.
pub fn router(store: Arc<SqliteStore>, auth: Arc<AuthConfig>) -> Router {
  Router::new()
    .nest("/api", gatelog_api::api_router(store))
    .layer(middleware::from_fn_with_state(auth, auth::require_auth))
    .layer(TraceLayer::new_for_http())
}
