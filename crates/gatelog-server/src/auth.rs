//! HTTP Basic-auth verification for the API edge.
//!
//! Authentication internals stop here: handlers below this layer never see
//! credentials, only requests that already passed.

use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  body::Body,
  extract::{Request, State},
  http::HeaderMap,
  middleware::Next,
  response::Response,
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;

use crate::error::Error;

/// Credentials accepted as valid for this server instance.
#[derive(Clone)]
pub struct AuthConfig {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// Verify credentials directly from headers.
pub fn verify_auth(headers: &HeaderMap, config: &AuthConfig) -> Result<(), Error> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(Error::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| Error::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| Error::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(Error::Unauthorized)?;

  if username != config.username {
    return Err(Error::Unauthorized);
  }

  let parsed_hash = PasswordHash::new(&config.password_hash)
    .map_err(|_| Error::Unauthorized)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| Error::Unauthorized)?;

  Ok(())
}

/// Middleware guarding everything nested under it.
pub async fn require_auth(
  State(config): State<Arc<AuthConfig>>,
  request: Request<Body>,
  next: Next,
) -> Result<Response, Error> {
  verify_auth(request.headers(), &config)?;
  Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
  use argon2::{PasswordHasher, password_hash::SaltString};
  use axum::http::header;
  use rand_core::OsRng;

  use super::*;

  fn config_for(password: &str) -> AuthConfig {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .expect("hash")
      .to_string();
    AuthConfig { username: "frontdesk".into(), password_hash: hash }
  }

  fn headers_for(username: &str, password: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let token = B64.encode(format!("{username}:{password}"));
    headers.insert(
      header::AUTHORIZATION,
      format!("Basic {token}").parse().expect("header"),
    );
    headers
  }

  #[test]
  fn accepts_matching_credentials() {
    let config = config_for("s3cret");
    let headers = headers_for("frontdesk", "s3cret");
    assert!(verify_auth(&headers, &config).is_ok());
  }

  #[test]
  fn rejects_wrong_password_and_unknown_user() {
    let config = config_for("s3cret");
    assert!(verify_auth(&headers_for("frontdesk", "nope"), &config).is_err());
    assert!(verify_auth(&headers_for("visitor", "s3cret"), &config).is_err());
  }

  #[test]
  fn rejects_missing_or_malformed_header() {
    let config = config_for("s3cret");
    assert!(verify_auth(&HeaderMap::new(), &config).is_err());

    let mut headers = HeaderMap::new();
    headers.insert(
      header::AUTHORIZATION,
      "Bearer whatever".parse().expect("header"),
    );
    assert!(verify_auth(&headers, &config).is_err());
  }
}
