//! Async HTTP client wrapping the gatelog JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use gatelog_core::record::VisitorRecord;
use reqwest::{Client, StatusCode};
use serde::Serialize;

/// Connection settings for the gatelog API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub username: String,
  pub password: String,
}

/// Query parameters for the visitor list endpoint, serialised onto the URL.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListQuery {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub status:     Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub department: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub search:     Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sort:       Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub direction:  Option<String>,
}

/// Body for `POST /api/visitors`, in the API's camelCase wire shape.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
  pub name:             String,
  pub contact_number:   String,
  pub purpose_of_visit: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub whom_to_meet:     Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub department:       Option<String>,
  pub kind:             String,
}

/// Async HTTP client for the gatelog JSON REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    req.basic_auth(&self.config.username, Some(&self.config.password))
  }

  /// Surface the API's JSON error body when a request is rejected.
  async fn expect_success(
    resp: reqwest::Response,
    what: &str,
  ) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let detail = resp
      .json::<serde_json::Value>()
      .await
      .ok()
      .map(|v| v.to_string())
      .unwrap_or_default();
    Err(anyhow!("{what} → {status} {detail}"))
  }

  /// `GET /api/visitors`
  pub async fn list_visitors(
    &self,
    query: &ListQuery,
  ) -> Result<Vec<VisitorRecord>> {
    tracing::debug!(?query, "listing visitors");
    let resp = self
      .auth(self.client.get(self.url("/visitors")).query(query))
      .send()
      .await
      .context("GET /visitors failed")?;
    let resp = Self::expect_success(resp, "GET /visitors").await?;
    resp.json().await.context("deserialising visitors")
  }

  /// `GET /api/visitors/:id` — `None` on 404.
  pub async fn get_visitor(&self, id: &str) -> Result<Option<VisitorRecord>> {
    let resp = self
      .auth(self.client.get(self.url(&format!("/visitors/{id}"))))
      .send()
      .await
      .context("GET /visitors/:id failed")?;
    if resp.status() == StatusCode::NOT_FOUND {
      return Ok(None);
    }
    let resp = Self::expect_success(resp, "GET /visitors/:id").await?;
    Ok(Some(resp.json().await.context("deserialising visitor")?))
  }

  /// `POST /api/visitors`
  pub async fn register(
    &self,
    registration: &Registration,
  ) -> Result<VisitorRecord> {
    let resp = self
      .auth(self.client.post(self.url("/visitors")).json(registration))
      .send()
      .await
      .context("POST /visitors failed")?;
    let resp = Self::expect_success(resp, "POST /visitors").await?;
    resp.json().await.context("deserialising visitor")
  }

  async fn transition(&self, id: &str, action: &str) -> Result<VisitorRecord> {
    let path = format!("/visitors/{id}/{action}");
    let resp = self
      .auth(self.client.post(self.url(&path)))
      .send()
      .await
      .with_context(|| format!("POST {path} failed"))?;
    let resp = Self::expect_success(resp, &format!("POST {path}")).await?;
    resp.json().await.context("deserialising visitor")
  }

  /// `POST /api/visitors/:id/check-in`
  pub async fn check_in(&self, id: &str) -> Result<VisitorRecord> {
    self.transition(id, "check-in").await
  }

  /// `POST /api/visitors/:id/check-out`
  pub async fn check_out(&self, id: &str) -> Result<VisitorRecord> {
    self.transition(id, "check-out").await
  }

  /// `DELETE /api/visitors/:id`
  pub async fn remove(&self, id: &str) -> Result<()> {
    let resp = self
      .auth(self.client.delete(self.url(&format!("/visitors/{id}"))))
      .send()
      .await
      .context("DELETE /visitors/:id failed")?;
    Self::expect_success(resp, "DELETE /visitors/:id").await?;
    Ok(())
  }
}
