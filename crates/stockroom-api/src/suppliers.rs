//! Handlers for `/suppliers` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/suppliers` | All suppliers |
//! | `POST`   | `/suppliers` | Body: `{"name":"...","contact":"..."}` |
//! | `GET`    | `/suppliers/:id` | 404 if not found |
//! | `PATCH`  | `/suppliers/:id` | Partial update |
//! | `DELETE` | `/suppliers/:id` | Products keep existing without a supplier |

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use serde_json::{Value, json};
use stockroom_core::{
  Error as DomainError,
  store::InventoryStore,
  supplier::{NewSupplier, Supplier, SupplierPatch},
  validation::require_fields,
};

use crate::{
  AppState,
  error::ApiError,
  extract::{ApiJson, ApiPath},
  token::AuthUser,
};

/// `GET /suppliers`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  _user: AuthUser,
) -> Result<Json<Vec<Supplier>>, ApiError>
where
  S: InventoryStore + Clone + 'static,
{
  let suppliers = state
    .store
    .list_suppliers()
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(suppliers))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name:    Option<String>,
  pub contact: Option<String>,
}

/// `POST /suppliers`: returns 201 + the stored [`Supplier`].
pub async fn create<S>(
  State(state): State<AppState<S>>,
  _user: AuthUser,
  ApiJson(body): ApiJson<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: InventoryStore + Clone + 'static,
{
  require_fields(&[
    ("name", body.name.as_deref()),
    ("contact", body.contact.as_deref()),
  ])?;

  let supplier = state
    .store
    .create_supplier(NewSupplier {
      name:    body.name.unwrap_or_default(),
      contact: body.contact.unwrap_or_default(),
    })
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(supplier)))
}

/// `GET /suppliers/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  _user: AuthUser,
  ApiPath(id): ApiPath<i64>,
) -> Result<Json<Supplier>, ApiError>
where
  S: InventoryStore + Clone + 'static,
{
  let supplier = state
    .store
    .get_supplier(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or(DomainError::SupplierNotFound(id))?;
  Ok(Json(supplier))
}

/// `PATCH /suppliers/:id`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  _user: AuthUser,
  ApiPath(id): ApiPath<i64>,
  ApiJson(patch): ApiJson<SupplierPatch>,
) -> Result<Json<Supplier>, ApiError>
where
  S: InventoryStore + Clone + 'static,
{
  let supplier = state
    .store
    .update_supplier(id, patch)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(supplier))
}

/// `DELETE /suppliers/:id`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  _user: AuthUser,
  ApiPath(id): ApiPath<i64>,
) -> Result<Json<Value>, ApiError>
where
  S: InventoryStore + Clone + 'static,
{
  state
    .store
    .delete_supplier(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(json!({ "message": format!("supplier {id} deleted") })))
}
