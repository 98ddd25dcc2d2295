//! The visitor record — the unit everything else filters, sorts, and updates.
//!
//! Records are produced exclusively by normalizing stored documents (see
//! [`crate::document`]); nothing in the client constructs one from scratch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Status ──────────────────────────────────────────────────────────────────

/// Lifecycle stage of a visit.
///
/// Legal transitions: `Pending → In → Out` and `Pending → Out`. `Out` is
/// terminal; nothing ever returns to `Pending`.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum VisitStatus {
  /// Registered, not yet on premises.
  Pending,
  /// On premises.
  In,
  /// Departed. Terminal.
  Out,
}

impl VisitStatus {
  /// Display rank for the default log ordering: active visits first, then
  /// pending arrivals, then departures.
  pub fn priority(self) -> u8 {
    match self {
      Self::In => 0,
      Self::Pending => 1,
      Self::Out => 2,
    }
  }

  pub fn is_terminal(self) -> bool { matches!(self, Self::Out) }

  /// Whether `self → to` is a legal status transition.
  pub fn can_transition_to(self, to: Self) -> bool {
    matches!(
      (self, to),
      (Self::Pending, Self::In)
        | (Self::Pending, Self::Out)
        | (Self::In, Self::Out)
    )
  }

  /// The label written to stored documents.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Pending => "Pending",
      Self::In => "In",
      Self::Out => "Out",
    }
  }

  /// Parse a stored status label. Legacy documents carry lowercase
  /// `"pending"`; unknown labels degrade to `Pending` rather than erroring,
  /// in keeping with total normalization.
  pub fn parse_lenient(s: &str) -> Self {
    match s {
      "In" => Self::In,
      "Out" => Self::Out,
      _ => Self::Pending,
    }
  }
}

impl std::fmt::Display for VisitStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Kind ────────────────────────────────────────────────────────────────────

/// Discriminates walk-in visitors from cab bookings. Controls iconography in
/// consumers only; the pipeline treats both identically.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
  #[default]
  Visitor,
  Cab,
}

impl RecordKind {
  pub fn parse_lenient(s: &str) -> Self {
    if s.eq_ignore_ascii_case("cab") { Self::Cab } else { Self::Visitor }
  }

  /// The label written to stored documents.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Visitor => "visitor",
      Self::Cab => "cab",
    }
  }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// The normalized, fully-defaulted view of a stored visitor document.
///
/// Optional text fields default to `""` so that every downstream comparison
/// is a total function. Timestamps stay `Option` — absence is meaningful
/// (e.g. a visitor who has not checked in yet) and sorts as earliest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitorRecord {
  /// Opaque identifier assigned by the record store; immutable.
  pub id:             String,
  pub name:           String,
  pub contact_number: String,
  pub purpose:        String,
  pub whom_to_meet:   String,
  pub department:     String,
  pub status:         VisitStatus,
  pub check_in_time:  Option<DateTime<Utc>>,
  pub check_out_time: Option<DateTime<Utc>>,
  /// Tie-break ordering key; resolved from `lastUpdated`, else
  /// `checkInTime`, else `registrationDate` at normalization time.
  pub last_updated:   Option<DateTime<Utc>>,
  pub photo_url:      String,
  pub document_url:   String,
  pub kind:           RecordKind,
}

impl VisitorRecord {
  /// The record-level invariant: a visitor is `Out` exactly when a
  /// check-out time is recorded.
  pub fn is_consistent(&self) -> bool {
    self.status.is_terminal() == self.check_out_time.is_some()
  }
}
