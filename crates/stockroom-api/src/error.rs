//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection},
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use stockroom_core::{error::ErrorKind, store::StoreError};
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("unauthorized: {0}")]
  Unauthorized(String),

  #[error("internal error: {0}")]
  Internal(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Classify a backend error: domain rejections keep their message and get
  /// a 4xx status, anything else is a 500.
  pub fn from_store<E: StoreError>(err: E) -> Self {
    match err.as_domain() {
      Some(domain) => Self::from(domain),
      None => {
        tracing::error!(error = %err, "store failure");
        Self::Store(Box::new(err))
      }
    }
  }
}

impl From<&stockroom_core::Error> for ApiError {
  fn from(err: &stockroom_core::Error) -> Self {
    let message = err.to_string();
    match err.kind() {
      ErrorKind::NotFound => Self::NotFound(message),
      ErrorKind::Unauthorized => Self::Unauthorized(message),
      ErrorKind::Invalid => Self::BadRequest(message),
    }
  }
}

impl From<stockroom_core::Error> for ApiError {
  fn from(err: stockroom_core::Error) -> Self { Self::from(&err) }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { Self::BadRequest(rejection.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self { Self::BadRequest(rejection.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m.clone()),
      ApiError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m.clone()),
      // Details were logged in `from_store`.
      ApiError::Store(_) => {
        (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
      }
    };

    let mut res = (status, Json(json!({ "message": message }))).into_response();
    if status == StatusCode::UNAUTHORIZED {
      res
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    }
    res
  }
}
