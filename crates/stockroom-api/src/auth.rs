//! Handlers for `/auth` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/signup` | Body: [`SignupBody`]; returns 201 |
//! | `POST` | `/auth/login`  | Body: [`LoginBody`]; returns an access token |
//!
//! Signup checks run in this order: missing fields, duplicate name, duplicate
//! email, password pattern.
//!
//! The `password_hash` field carries the plaintext password on the wire; it is
//! hashed with argon2 before it reaches the store.

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use stockroom_core::{
  Error as DomainError,
  store::InventoryStore,
  user::NewUser,
  validation::{require_fields, validate_password},
};
use tracing::{info, warn};

use crate::{
  AppState,
  error::ApiError,
  extract::ApiJson,
  password::{hash_password, verify_dummy, verify_password},
};

// ─── Signup ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SignupBody {
  pub name:          Option<String>,
  pub email:         Option<String>,
  pub phone_number:  Option<String>,
  pub password_hash: Option<String>,
}

/// `POST /auth/signup`: returns 201 + `{"message", "id"}`.
pub async fn signup<S>(
  State(state): State<AppState<S>>,
  ApiJson(body): ApiJson<SignupBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: InventoryStore + Clone + 'static,
{
  require_fields(&[
    ("name", body.name.as_deref()),
    ("email", body.email.as_deref()),
    ("phone_number", body.phone_number.as_deref()),
    ("password", body.password_hash.as_deref()),
  ])?;
  let name = body.name.unwrap_or_default();
  let email = body.email.unwrap_or_default();
  state
    .store
    .ensure_user_unique(name.clone(), email.clone())
    .await
    .map_err(ApiError::from_store)?;

  let password = body.password_hash.unwrap_or_default();
  validate_password(&password)?;

  let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
    .await
    .map_err(|e| ApiError::Internal(format!("hashing task failed: {e}")))??;

  let user = state
    .store
    .create_user(NewUser {
      name,
      email,
      phone_number: body.phone_number.unwrap_or_default(),
      password_hash,
    })
    .await
    .map_err(ApiError::from_store)?;

  info!(user_id = user.id, "user signed up");
  Ok((
    StatusCode::CREATED,
    Json(json!({ "message": "User created successfully", "id": user.id })),
  ))
}

// ─── Login ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:         Option<String>,
  pub password_hash: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
  pub access_token: String,
  pub name:         String,
  pub id:           i64,
}

/// `POST /auth/login`: 200 + [`LoginResponse`], or 401.
pub async fn login<S>(
  State(state): State<AppState<S>>,
  ApiJson(body): ApiJson<LoginBody>,
) -> Result<Json<LoginResponse>, ApiError>
where
  S: InventoryStore + Clone + 'static,
{
  require_fields(&[
    ("email", body.email.as_deref()),
    ("password", body.password_hash.as_deref()),
  ])?;
  let email = body.email.unwrap_or_default();
  let password = body.password_hash.unwrap_or_default();

  let user = state
    .store
    .find_user_by_email(email.clone())
    .await
    .map_err(ApiError::from_store)?;

  // Unknown emails still pay for one argon2 verification.
  let phc = user.as_ref().map(|u| u.password_hash.clone());
  let matches = tokio::task::spawn_blocking(move || match phc {
    Some(phc) => verify_password(&password, &phc),
    None => verify_dummy(&password),
  })
  .await
  .map_err(|e| ApiError::Internal(format!("hashing task failed: {e}")))?;

  let user = match user {
    Some(user) if matches => user,
    Some(user) => {
      warn!(user_id = user.id, "login with wrong password");
      return Err(DomainError::InvalidCredentials.into());
    }
    None => {
      warn!(%email, "login for unknown email");
      return Err(DomainError::InvalidCredentials.into());
    }
  };

  let access_token = state.tokens.issue(user.id)?;
  info!(user_id = user.id, "user logged in");

  Ok(Json(LoginResponse {
    access_token,
    name: user.name,
    id: user.id,
  }))
}
