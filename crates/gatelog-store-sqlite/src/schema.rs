//! Database schema.

/// Idempotent schema initialisation, run on every open.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS visitors (
  -- Opaque store-assigned identifier.
  doc_id        TEXT PRIMARY KEY,
  -- The full document, schema-less JSON. Reads normalize through
  -- gatelog-core; the store never interprets individual fields here.
  body_json     TEXT NOT NULL,
  -- Denormalised ordering key for the subscription query shape
  -- (descending by registration time).
  registered_at TEXT NOT NULL
) STRICT;

CREATE INDEX IF NOT EXISTS idx_visitors_registered_at
  ON visitors (registered_at DESC);
"#;
