//! Encoding helpers between core types and SQLite column values.

use chrono::{DateTime, SecondsFormat, Utc};
use gatelog_core::document::RawDocument;

use crate::Result;

/// Timestamps are stored as ISO-8601 strings, matching the wire format the
/// original record store used.
pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn encode_document(doc: &RawDocument) -> Result<String> {
  Ok(serde_json::to_string(doc)?)
}

pub fn decode_document(body: &str) -> Result<RawDocument> {
  Ok(serde_json::from_str(body)?)
}
