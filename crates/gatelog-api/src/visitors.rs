//! Handlers for `/visitors` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/visitors` | Filter/sort via query params; see [`ListParams`] |
//! | `POST`   | `/visitors` | Validated registration; 422 on field errors |
//! | `GET`    | `/visitors/:id` | 404 if not found |
//! | `DELETE` | `/visitors/:id` | |
//! | `POST`   | `/visitors/:id/check-in` | `Pending → In`; 409 on conflict |
//! | `POST`   | `/visitors/:id/check-out` | `→ Out`; 409 on conflict |

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use gatelog_core::{
  filter::{self, FilterConfig, SortDirection, SortKey},
  record::{RecordKind, VisitStatus, VisitorRecord},
  store::{NewVisitor, VisitorStore},
};
use gatelog_validate::{Field, format, validate};
use serde::Deserialize;

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

/// Query params for `GET /visitors`. They map onto
/// [`gatelog_core::filter::FilterConfig`]; the store is never asked to
/// filter — the pipeline does all of it.
#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  /// Comma-separated status labels, e.g. `In,Pending`.
  pub status:     Option<String>,
  /// Comma-separated department names.
  pub department: Option<String>,
  pub search:     Option<String>,
  pub sort:       Option<SortKey>,
  pub direction:  Option<SortDirection>,
}

fn parse_status(label: &str) -> Result<VisitStatus, ApiError> {
  for status in [VisitStatus::In, VisitStatus::Out, VisitStatus::Pending] {
    if label.eq_ignore_ascii_case(status.as_str()) {
      return Ok(status);
    }
  }
  Err(ApiError::BadRequest(format!("unknown status: {label:?}")))
}

impl ListParams {
  fn into_config(self) -> Result<FilterConfig, ApiError> {
    let status = self
      .status
      .as_deref()
      .unwrap_or_default()
      .split(',')
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(parse_status)
      .collect::<Result<BTreeSet<_>, _>>()?;

    let department: BTreeSet<String> = self
      .department
      .as_deref()
      .unwrap_or_default()
      .split(',')
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(str::to_owned)
      .collect();

    Ok(FilterConfig {
      status,
      department,
      search: self.search,
      sort: self.sort,
      direction: self.direction.unwrap_or_default(),
    })
  }
}

/// `GET /visitors[?status=…][&department=…][&search=…][&sort=…][&direction=…]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<VisitorRecord>>, ApiError>
where
  S: VisitorStore,
{
  let config = params.into_config()?;
  let records = store
    .list()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(filter::apply(&records, &config)))
}

// ─── Register ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBody {
  pub name:             String,
  pub contact_number:   String,
  pub purpose_of_visit: String,
  pub whom_to_meet:     Option<String>,
  pub department:       Option<String>,
  pub photo_url:        Option<String>,
  pub document_url:     Option<String>,
  #[serde(default)]
  pub kind:             RecordKind,
}

impl RegisterBody {
  /// Run the field rules over every provided field; the result contains
  /// only the fields that failed.
  fn validation_errors(&self) -> BTreeMap<Field, String> {
    let mut checks: Vec<(Field, &str)> = vec![
      (Field::Name, self.name.as_str()),
      (Field::ContactNumber, self.contact_number.as_str()),
      (Field::PurposeOfVisit, self.purpose_of_visit.as_str()),
    ];
    if let Some(whom) = &self.whom_to_meet {
      checks.push((Field::PersonToMeet, whom.as_str()));
    }
    if let Some(dept) = &self.department {
      checks.push((Field::Department, dept.as_str()));
    }

    checks
      .into_iter()
      .filter_map(|(field, value)| {
        validate(field, value).map(|message| (field, message))
      })
      .collect()
  }
}

/// `POST /visitors` — validated registration. 201 with the normalized record
/// on success, 422 with a `{field: message}` map on validation failure.
pub async fn register<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: VisitorStore,
{
  let errors = body.validation_errors();
  if !errors.is_empty() {
    return Err(ApiError::Validation(errors));
  }

  let input = NewVisitor {
    name: body.name.trim().to_owned(),
    contact_number: format::contact_number(&body.contact_number),
    purpose: body.purpose_of_visit.trim().to_owned(),
    whom_to_meet: body.whom_to_meet,
    department: body.department,
    photo_url: body.photo_url,
    document_url: body.document_url,
    kind: body.kind,
  };

  let record = store
    .register(input)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(record)))
}

// ─── Get one / remove ─────────────────────────────────────────────────────────

/// `GET /visitors/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<VisitorRecord>, ApiError>
where
  S: VisitorStore,
{
  let record = store
    .get(&id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("visitor {id} not found")))?;
  Ok(Json(record))
}

/// `DELETE /visitors/:id`
pub async fn remove<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: VisitorStore,
{
  require_exists(&*store, &id).await?;
  store
    .remove(&id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Status transitions ───────────────────────────────────────────────────────

async fn require_exists<S>(store: &S, id: &str) -> Result<(), ApiError>
where
  S: VisitorStore,
{
  store
    .get(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .map(drop)
    .ok_or_else(|| ApiError::NotFound(format!("visitor {id} not found")))
}

/// `POST /visitors/:id/check-in`
pub async fn check_in<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<VisitorRecord>, ApiError>
where
  S: VisitorStore,
{
  require_exists(&*store, &id).await?;
  let record = store
    .check_in(&id)
    .await
    .map_err(|e| ApiError::Conflict(e.to_string()))?;
  Ok(Json(record))
}

/// `POST /visitors/:id/check-out`
pub async fn check_out<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<VisitorRecord>, ApiError>
where
  S: VisitorStore,
{
  require_exists(&*store, &id).await?;
  let record = store
    .check_out(&id)
    .await
    .map_err(|e| ApiError::Conflict(e.to_string()))?;
  Ok(Json(record))
}
