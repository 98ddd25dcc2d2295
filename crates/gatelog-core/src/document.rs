//! Stored-document shapes and normalization.
//!
//! The record store's schema is not statically enforced, so every field of a
//! stored document is optional here and [`normalize`] is total: an absent or
//! malformed field degrades to its default instead of raising an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::{RecordKind, VisitStatus, VisitorRecord};

// ─── Raw shapes ──────────────────────────────────────────────────────────────

/// The nested additional-details object carried by visitor documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdditionalDetails {
  pub whom_to_meet:      Option<String>,
  pub department:        Option<String>,
  pub visitor_photo_url: Option<String>,
  pub document_url:      Option<String>,
}

/// The serde image of a stored visitor document. Field names match the wire
/// format of the record store collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawDocument {
  pub name:               Option<String>,
  pub contact_number:     Option<String>,
  pub purpose_of_visit:   Option<String>,
  pub status:             Option<String>,
  pub check_in_time:      Option<String>,
  pub check_out_time:     Option<String>,
  pub last_updated:       Option<String>,
  pub registration_date:  Option<String>,
  #[serde(rename = "type")]
  pub kind:               Option<String>,
  pub additional_details: Option<AdditionalDetails>,
}

// ─── Normalization ───────────────────────────────────────────────────────────

/// Parse an ISO-8601 timestamp; anything unparsable is treated as absent.
fn parse_ts(s: &Option<String>) -> Option<DateTime<Utc>> {
  s.as_deref()
    .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
    .map(|dt| dt.with_timezone(&Utc))
}

fn or_empty(s: &Option<String>) -> String {
  s.clone().unwrap_or_default()
}

/// Map a raw stored document to a complete, defaulted [`VisitorRecord`].
///
/// Never fails. `last_updated` resolves to the first present of
/// `lastUpdated`, `checkInTime`, `registrationDate`.
pub fn normalize(id: &str, doc: &RawDocument) -> VisitorRecord {
  let details = doc.additional_details.clone().unwrap_or_default();

  let check_in_time = parse_ts(&doc.check_in_time);
  let check_out_time = parse_ts(&doc.check_out_time);
  let last_updated = parse_ts(&doc.last_updated)
    .or(check_in_time)
    .or_else(|| parse_ts(&doc.registration_date));

  VisitorRecord {
    id: id.to_owned(),
    name: or_empty(&doc.name),
    contact_number: or_empty(&doc.contact_number),
    purpose: or_empty(&doc.purpose_of_visit),
    whom_to_meet: or_empty(&details.whom_to_meet),
    department: or_empty(&details.department),
    status: doc
      .status
      .as_deref()
      .map(VisitStatus::parse_lenient)
      .unwrap_or(VisitStatus::Pending),
    check_in_time,
    check_out_time,
    last_updated,
    photo_url: or_empty(&details.visitor_photo_url),
    document_url: or_empty(&details.document_url),
    kind: doc
      .kind
      .as_deref()
      .map(RecordKind::parse_lenient)
      .unwrap_or_default(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_document_normalizes_to_full_defaults() {
    let rec = normalize("v1", &RawDocument::default());
    assert_eq!(rec.id, "v1");
    assert_eq!(rec.name, "");
    assert_eq!(rec.contact_number, "");
    assert_eq!(rec.purpose, "");
    assert_eq!(rec.whom_to_meet, "");
    assert_eq!(rec.department, "");
    assert_eq!(rec.status, VisitStatus::Pending);
    assert_eq!(rec.kind, RecordKind::Visitor);
    assert!(rec.check_in_time.is_none());
    assert!(rec.last_updated.is_none());
  }

  #[test]
  fn last_updated_prefers_explicit_field() {
    let doc = RawDocument {
      last_updated: Some("2025-03-01T12:00:00Z".into()),
      check_in_time: Some("2025-03-01T09:00:00Z".into()),
      registration_date: Some("2025-02-28T08:00:00Z".into()),
      ..Default::default()
    };
    let rec = normalize("v1", &doc);
    assert_eq!(rec.last_updated, parse_ts(&doc.last_updated));
  }

  #[test]
  fn last_updated_falls_back_to_check_in_then_registration() {
    let doc = RawDocument {
      check_in_time: Some("2025-03-01T09:00:00Z".into()),
      registration_date: Some("2025-02-28T08:00:00Z".into()),
      ..Default::default()
    };
    assert_eq!(normalize("v", &doc).last_updated, normalize("v", &doc).check_in_time);

    let doc = RawDocument {
      registration_date: Some("2025-02-28T08:00:00Z".into()),
      ..Default::default()
    };
    assert_eq!(
      normalize("v", &doc).last_updated,
      parse_ts(&doc.registration_date)
    );
  }

  #[test]
  fn malformed_timestamp_degrades_to_absent() {
    let doc = RawDocument {
      check_in_time: Some("yesterday-ish".into()),
      ..Default::default()
    };
    let rec = normalize("v1", &doc);
    assert!(rec.check_in_time.is_none());
    assert!(rec.last_updated.is_none());
  }

  #[test]
  fn nested_details_flatten_into_record() {
    let doc = RawDocument {
      name: Some("Asha Rao".into()),
      kind: Some("cab".into()),
      additional_details: Some(AdditionalDetails {
        whom_to_meet: Some("R. Iyer".into()),
        department: Some("Engineering".into()),
        visitor_photo_url: Some("https://cdn/p.jpg".into()),
        document_url: None,
      }),
      ..Default::default()
    };
    let rec = normalize("v2", &doc);
    assert_eq!(rec.whom_to_meet, "R. Iyer");
    assert_eq!(rec.department, "Engineering");
    assert_eq!(rec.photo_url, "https://cdn/p.jpg");
    assert_eq!(rec.document_url, "");
    assert_eq!(rec.kind, RecordKind::Cab);
  }
}
