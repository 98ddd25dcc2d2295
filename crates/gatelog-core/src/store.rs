//! The `VisitorStore` trait and supporting types.
//!
//! The trait is implemented by storage backends (e.g. `gatelog-store-sqlite`).
//! Higher layers (`gatelog-api`, sessions) depend on this abstraction, not on
//! any concrete backend.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::record::{RecordKind, VisitorRecord};

// ─── Registration input ──────────────────────────────────────────────────────

/// Input to [`VisitorStore::register`]. The store assigns the document id,
/// the registration timestamp, and the initial `Pending` status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewVisitor {
  pub name:           String,
  pub contact_number: String,
  pub purpose:        String,
  pub whom_to_meet:   Option<String>,
  pub department:     Option<String>,
  pub photo_url:      Option<String>,
  pub document_url:   Option<String>,
  pub kind:           RecordKind,
}

// ─── Subscription ────────────────────────────────────────────────────────────

/// A batch delivered on a live log subscription.
#[derive(Debug, Clone)]
pub enum LogEvent {
  /// A full replacement snapshot of the collection. Consumers swap their
  /// entire in-memory set; object identity does not survive across batches.
  Snapshot(Vec<VisitorRecord>),
  /// A non-fatal subscription fault. Emitted at most once per subscription
  /// lifetime; previously delivered data remains valid.
  Fault(String),
}

/// A standing subscription against the record store.
///
/// The store delivers the full current snapshot first and a replacement
/// snapshot after every mutation, in emission order.
pub trait LogSubscription: Send {
  /// Await the next event. Returns `None` once the subscription is
  /// unsubscribed or the store side is gone — never an event after that.
  fn next_event(
    &mut self,
  ) -> impl Future<Output = Option<LogEvent>> + Send + '_;

  /// Sever the subscription. Idempotent; guarantees that no further event
  /// is delivered, including ones already in flight.
  fn unsubscribe(&mut self);
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a visitor record store backend.
///
/// Status mutations are single atomic partial updates; the live subscription
/// is the sole channel through which their effects reach consumers.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait VisitorStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;
  type Subscription: LogSubscription;

  /// Create a `Pending` visitor document and return its normalized record.
  fn register(
    &self,
    input: NewVisitor,
  ) -> impl Future<Output = Result<VisitorRecord, Self::Error>> + Send + '_;

  /// Retrieve one record by id. Returns `None` if not found.
  fn get(
    &self,
    id: &str,
  ) -> impl Future<Output = Result<Option<VisitorRecord>, Self::Error>> + Send;

  /// List all records, ordered descending by the registration/check-in key.
  /// No store-side filtering — that is the pipeline's job.
  fn list(
    &self,
  ) -> impl Future<Output = Result<Vec<VisitorRecord>, Self::Error>> + Send + '_;

  /// Transition `Pending → In`, setting `check_in_time` and `last_updated`.
  fn check_in(
    &self,
    id: &str,
  ) -> impl Future<Output = Result<VisitorRecord, Self::Error>> + Send;

  /// Transition `{Pending, In} → Out`, setting `status`, `check_out_time`,
  /// and `last_updated` in one atomic update. Errors if already `Out`.
  fn check_out(
    &self,
    id: &str,
  ) -> impl Future<Output = Result<VisitorRecord, Self::Error>> + Send;

  /// Delete a document. Subscribers observe the deletion through the next
  /// snapshot.
  fn remove(
    &self,
    id: &str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send;

  /// Open a live subscription scoped to the whole collection.
  fn subscribe(
    &self,
  ) -> impl Future<Output = Result<Self::Subscription, Self::Error>> + Send + '_;
}
