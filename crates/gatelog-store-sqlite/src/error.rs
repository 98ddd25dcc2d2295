//! Error types for `gatelog-store-sqlite`.

use gatelog_core::record::VisitStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("SQLite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("connection error: {0}")]
  Connection(#[from] tokio_rusqlite::Error),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("visitor record not found: {0}")]
  RecordNotFound(String),

  #[error("visitor {0} is already checked out")]
  AlreadyCheckedOut(String),

  #[error("illegal status transition: {from} → {to}")]
  IllegalTransition { from: VisitStatus, to: VisitStatus },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
