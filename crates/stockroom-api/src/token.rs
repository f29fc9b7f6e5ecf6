//! Access tokens: issuing signed JWTs at login and the bearer-token extractor
//! that guards every other route.

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use stockroom_core::store::InventoryStore;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Default access-token lifetime.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
  pub user_id: i64,
  /// Issued at (Unix timestamp).
  pub iat:     i64,
  /// Expiration (Unix timestamp).
  pub exp:     i64,
  /// Unique token id.
  pub jti:     String,
}

/// Signs and verifies HS256 access tokens with a shared secret.
pub struct TokenIssuer {
  encoding: EncodingKey,
  decoding: DecodingKey,
  ttl:      Duration,
}

impl TokenIssuer {
  pub fn new(secret: &str, ttl: Duration) -> Self {
    Self {
      encoding: EncodingKey::from_secret(secret.as_bytes()),
      decoding: DecodingKey::from_secret(secret.as_bytes()),
      ttl,
    }
  }

  pub fn ttl(&self) -> Duration { self.ttl }

  /// Issue a token for `user_id` that expires after the configured lifetime.
  pub fn issue(&self, user_id: i64) -> Result<String, ApiError> {
    let now = Utc::now();
    let claims = Claims {
      user_id,
      iat: now.timestamp(),
      exp: (now + self.ttl).timestamp(),
      jti: Uuid::new_v4().to_string(),
    };

    encode(&Header::default(), &claims, &self.encoding)
      .map_err(|e| ApiError::Internal(format!("failed to sign token: {e}")))
  }

  /// Check the signature and expiry of `token` and return its claims.
  pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(token, &self.decoding, &Validation::default())
      .map(|data| data.claims)
      .map_err(|e| ApiError::Unauthorized(format!("invalid token: {e}")))
  }
}

/// Pull the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
  headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .ok_or_else(|| ApiError::Unauthorized("token is missing".to_string()))
}

/// Present in a handler's arguments means the request carried a valid token.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
  pub user_id: i64,
}

impl<S> FromRequestParts<AppState<S>> for AuthUser
where
  S: InventoryStore + Clone + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let token = bearer_token(&parts.headers)?;
    let claims = state.tokens.verify(token)?;
    Ok(AuthUser { user_id: claims.user_id })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::HeaderValue;

  fn issuer() -> TokenIssuer {
    TokenIssuer::new("test-secret", Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES))
  }

  #[test]
  fn token_carries_user_id_and_expires_in_thirty_minutes() {
    let tokens = issuer();
    let token = tokens.issue(42).unwrap();
    let claims = tokens.verify(&token).unwrap();

    assert_eq!(claims.user_id, 42);
    assert_eq!(claims.exp - claims.iat, 30 * 60);
  }

  #[test]
  fn token_signed_with_other_secret_rejected() {
    let token = TokenIssuer::new("other", Duration::minutes(30))
      .issue(1)
      .unwrap();
    assert!(matches!(issuer().verify(&token), Err(ApiError::Unauthorized(_))));
  }

  #[test]
  fn expired_token_rejected() {
    let tokens = TokenIssuer::new("test-secret", Duration::minutes(-10));
    let token = tokens.issue(1).unwrap();
    assert!(matches!(tokens.verify(&token), Err(ApiError::Unauthorized(_))));
  }

  #[test]
  fn bearer_header_parsing() {
    let mut headers = HeaderMap::new();
    assert!(bearer_token(&headers).is_err());

    headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
    assert!(bearer_token(&headers).is_err());

    headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
    assert_eq!(bearer_token(&headers).unwrap(), "abc.def");
  }
}
