//! The filter/sort pipeline — how the visible log is derived.
//!
//! [`apply`] is pure and total. Stage order is fixed: status filter,
//! department filter, free-text search, then ordering (status priority with
//! `last_updated` descending by default, or the explicit sort key when set).

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::record::{VisitorRecord, VisitStatus};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Sort key for the explicit ordering override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
  Name,
  CheckInTime,
  Status,
  Department,
}

#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
  #[default]
  Ascending,
  Descending,
}

/// Screen-session filter state. Owned by the session; reset with it.
///
/// An empty membership set means "no restriction on that dimension", never
/// "match nothing".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
  pub status:     BTreeSet<VisitStatus>,
  pub department: BTreeSet<String>,
  pub search:     Option<String>,
  /// When `None`, the default status-priority ordering applies.
  pub sort:       Option<SortKey>,
  pub direction:  SortDirection,
}

impl FilterConfig {
  pub fn is_default(&self) -> bool { *self == Self::default() }
}

// ─── Comparison helpers ──────────────────────────────────────────────────────

/// Case-insensitive string ordering with a raw-bytes tiebreak, keeping the
/// comparison deterministic for strings that differ only in case.
fn cmp_ci(a: &str, b: &str) -> Ordering {
  a.to_lowercase()
    .cmp(&b.to_lowercase())
    .then_with(|| a.cmp(b))
}

/// Default display order: status priority `In < Pending < Out`, then
/// `last_updated` descending. Absent timestamps sort as earliest, so they
/// land last in the descending tiebreak.
fn cmp_default(a: &VisitorRecord, b: &VisitorRecord) -> Ordering {
  a.status
    .priority()
    .cmp(&b.status.priority())
    .then_with(|| b.last_updated.cmp(&a.last_updated))
}

fn cmp_by_key(a: &VisitorRecord, b: &VisitorRecord, key: SortKey) -> Ordering {
  match key {
    SortKey::Name => cmp_ci(&a.name, &b.name),
    SortKey::CheckInTime => a.check_in_time.cmp(&b.check_in_time),
    SortKey::Status => a.status.priority().cmp(&b.status.priority()),
    SortKey::Department => cmp_ci(&a.department, &b.department),
  }
}

fn matches_search(record: &VisitorRecord, needle: &str) -> bool {
  let needle = needle.to_lowercase();
  [
    &record.name,
    &record.contact_number,
    &record.purpose,
    &record.department,
  ]
  .into_iter()
  .any(|field| field.to_lowercase().contains(&needle))
}

// ─── Pipeline ────────────────────────────────────────────────────────────────

/// Derive the visible, ordered subset of `records` under `config`.
///
/// Deterministic and idempotent on ordering: the sort is stable and every
/// comparison is total, so re-applying the same config is a no-op.
pub fn apply(
  records: &[VisitorRecord],
  config: &FilterConfig,
) -> Vec<VisitorRecord> {
  let mut visible: Vec<VisitorRecord> = records
    .iter()
    .filter(|r| config.status.is_empty() || config.status.contains(&r.status))
    .filter(|r| {
      config.department.is_empty() || config.department.contains(&r.department)
    })
    .filter(|r| match config.search.as_deref() {
      Some(q) if !q.trim().is_empty() => matches_search(r, q.trim()),
      _ => true,
    })
    .cloned()
    .collect();

  match config.sort {
    None => visible.sort_by(cmp_default),
    Some(key) => visible.sort_by(|a, b| {
      let ord = cmp_by_key(a, b, key);
      match config.direction {
        SortDirection::Ascending => ord,
        SortDirection::Descending => ord.reverse(),
      }
    }),
  }

  visible
}

#[cfg(test)]
mod tests {
  use chrono::{DateTime, Utc};

  use super::*;
  use crate::record::RecordKind;

  fn ts(s: &str) -> Option<DateTime<Utc>> {
    Some(s.parse().expect("test timestamp"))
  }

  fn record(id: &str, name: &str, status: VisitStatus) -> VisitorRecord {
    VisitorRecord {
      id: id.into(),
      name: name.into(),
      contact_number: "9876543210".into(),
      purpose: "quarterly vendor review meeting".into(),
      whom_to_meet: "A. Menon".into(),
      department: "Engineering".into(),
      status,
      check_in_time: None,
      check_out_time: None,
      last_updated: ts("2025-03-01T10:00:00Z"),
      photo_url: String::new(),
      document_url: String::new(),
      kind: RecordKind::Visitor,
    }
  }

  #[test]
  fn default_order_is_in_pending_out_on_equal_timestamps() {
    let records = vec![
      record("a", "Ivy", VisitStatus::In),
      record("b", "Otto", VisitStatus::Out),
      record("c", "Pia", VisitStatus::Pending),
    ];
    let visible = apply(&records, &FilterConfig::default());
    let statuses: Vec<_> = visible.iter().map(|r| r.status).collect();
    assert_eq!(
      statuses,
      vec![VisitStatus::In, VisitStatus::Pending, VisitStatus::Out]
    );
  }

  #[test]
  fn default_order_is_monotone_in_priority() {
    let records = vec![
      record("a", "A", VisitStatus::Out),
      record("b", "B", VisitStatus::In),
      record("c", "C", VisitStatus::Pending),
      record("d", "D", VisitStatus::In),
      record("e", "E", VisitStatus::Out),
    ];
    let visible = apply(&records, &FilterConfig::default());
    for pair in visible.windows(2) {
      assert!(pair[0].status.priority() <= pair[1].status.priority());
    }
  }

  #[test]
  fn default_tiebreak_is_last_updated_descending() {
    let mut older = record("a", "A", VisitStatus::In);
    older.last_updated = ts("2025-03-01T08:00:00Z");
    let mut newer = record("b", "B", VisitStatus::In);
    newer.last_updated = ts("2025-03-01T11:00:00Z");
    let mut dateless = record("c", "C", VisitStatus::In);
    dateless.last_updated = None;

    let visible =
      apply(&[older, newer, dateless], &FilterConfig::default());
    let ids: Vec<_> = visible.iter().map(|r| r.id.as_str()).collect();
    // Absent timestamps are earliest, so they come last when descending.
    assert_eq!(ids, vec!["b", "a", "c"]);
  }

  #[test]
  fn apply_is_idempotent_on_ordering() {
    let records = vec![
      record("a", "Zoe", VisitStatus::Out),
      record("b", "Amir", VisitStatus::In),
      record("c", "Mei", VisitStatus::Pending),
    ];
    for config in [
      FilterConfig::default(),
      FilterConfig { sort: Some(SortKey::Name), ..Default::default() },
      FilterConfig {
        sort: Some(SortKey::CheckInTime),
        direction: SortDirection::Descending,
        ..Default::default()
      },
    ] {
      let once = apply(&records, &config);
      let twice = apply(&once, &config);
      assert_eq!(once, twice);
    }
  }

  #[test]
  fn empty_filter_sets_mean_no_restriction() {
    let records = vec![
      record("a", "A", VisitStatus::In),
      record("b", "B", VisitStatus::Out),
    ];
    let visible = apply(&records, &FilterConfig::default());
    assert_eq!(visible.len(), 2);
  }

  #[test]
  fn status_filter_restricts_membership() {
    let records = vec![
      record("a", "A", VisitStatus::In),
      record("b", "B", VisitStatus::Out),
      record("c", "C", VisitStatus::Pending),
    ];
    let config = FilterConfig {
      status: BTreeSet::from([VisitStatus::In, VisitStatus::Pending]),
      ..Default::default()
    };
    let visible = apply(&records, &config);
    assert!(visible.iter().all(|r| r.status != VisitStatus::Out));
    assert_eq!(visible.len(), 2);
  }

  #[test]
  fn department_filter_restricts_membership() {
    let mut sales = record("a", "A", VisitStatus::In);
    sales.department = "Sales".into();
    let eng = record("b", "B", VisitStatus::In);

    let config = FilterConfig {
      department: BTreeSet::from(["Sales".to_owned()]),
      ..Default::default()
    };
    let visible = apply(&[sales, eng], &config);
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, "a");
  }

  #[test]
  fn search_matches_case_insensitive_name_substring() {
    let records = vec![
      record("a", "Asha Rao", VisitStatus::In),
      record("b", "Benoit", VisitStatus::In),
    ];
    let config = FilterConfig {
      search: Some("sha r".into()),
      ..Default::default()
    };
    let visible = apply(&records, &config);
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, "a");
  }

  #[test]
  fn search_spans_contact_purpose_and_department() {
    let records = vec![record("a", "Asha", VisitStatus::In)];
    for q in ["8765", "vendor review", "engineer"] {
      let config = FilterConfig {
        search: Some(q.into()),
        ..Default::default()
      };
      assert_eq!(apply(&records, &config).len(), 1, "query {q:?}");
    }
    let config = FilterConfig {
      search: Some("no such text".into()),
      ..Default::default()
    };
    assert!(apply(&records, &config).is_empty());
  }

  #[test]
  fn blank_search_matches_everything() {
    let records = vec![record("a", "Asha", VisitStatus::In)];
    let config = FilterConfig {
      search: Some("   ".into()),
      ..Default::default()
    };
    assert_eq!(apply(&records, &config).len(), 1);
  }

  #[test]
  fn explicit_sort_replaces_default_ordering() {
    let records = vec![
      record("a", "zoe", VisitStatus::In),
      record("b", "Amir", VisitStatus::Out),
    ];
    let config = FilterConfig {
      sort: Some(SortKey::Name),
      ..Default::default()
    };
    let visible = apply(&records, &config);
    // Case-insensitive name order, ignoring status priority entirely.
    assert_eq!(visible[0].id, "b");
    assert_eq!(visible[1].id, "a");
  }

  #[test]
  fn descending_direction_reverses_explicit_sort() {
    let mut early = record("a", "A", VisitStatus::In);
    early.check_in_time = ts("2025-03-01T08:00:00Z");
    let mut late = record("b", "B", VisitStatus::In);
    late.check_in_time = ts("2025-03-01T12:00:00Z");
    let mut absent = record("c", "C", VisitStatus::In);
    absent.check_in_time = None;

    let config = FilterConfig {
      sort: Some(SortKey::CheckInTime),
      direction: SortDirection::Descending,
      ..Default::default()
    };
    let visible = apply(&[early, late, absent], &config);
    let ids: Vec<_> = visible.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a", "c"]);
  }

  #[test]
  fn apply_tolerates_empty_input() {
    assert!(apply(&[], &FilterConfig::default()).is_empty());
  }
}
