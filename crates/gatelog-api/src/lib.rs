//! JSON REST API for the gatelog visitor record service.
//!
//! Exposes an axum [`Router`] backed by any
//! [`gatelog_core::store::VisitorStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", gatelog_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod events;
pub mod visitors;


use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use gatelog_core::store::VisitorStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: VisitorStore + Clone + Send + Sync + 'static,
  S::Subscription: 'static,
{
  Router::new()
    // Visitors
    .route(
      "/visitors",
      get(visitors::list::<S>).post(visitors::register::<S>),
    )
    .route(
      "/visitors/{id}",
      get(visitors::get_one::<S>).delete(visitors::remove::<S>),
    )
    .route("/visitors/{id}/check-in", post(visitors::check_in::<S>))
    .route("/visitors/{id}/check-out", post(visitors::check_out::<S>))
    // Live log stream
    .route("/events", get(events::stream::<S>))
    .with_state(store)
}
