//! Error types for `gatelog-core`.

use thiserror::Error;

use crate::record::VisitStatus;

#[derive(Debug, Error)]
pub enum Error {
  #[error("visitor record not found: {0}")]
  RecordNotFound(String),

  #[error("visitor {0} is already checked out")]
  AlreadyCheckedOut(String),

  #[error("illegal status transition: {from} → {to}")]
  IllegalTransition { from: VisitStatus, to: VisitStatus },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error without losing it.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
