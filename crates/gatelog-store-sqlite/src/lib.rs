//! SQLite implementation of [`gatelog_core::store::VisitorStore`].
//!
//! Documents are kept as schema-less JSON bodies keyed by an opaque id, the
//! same shape the hosted record store used. Every mutation publishes a fresh
//! full snapshot to subscribers over a broadcast channel — replace the whole
//! set, no diffing.

mod encode;
mod error;
mod schema;
mod store;


pub use error::{Error, Result};
pub use store::{SqliteStore, SqliteSubscription};
