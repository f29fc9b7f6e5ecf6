//! Handlers for `/products` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/products` | All products |
//! | `POST`   | `/products` | Body: [`CreateBody`]; returns 201 + product |
//! | `GET`    | `/products/:id` | 404 if not found |
//! | `PATCH`  | `/products/:id` | Body: [`ProductPatch`]; partial update |
//! | `DELETE` | `/products/:id` | 404 if not found |

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
  product::{NewProduct, Product, ProductPatch},
  store::InventoryStore,
  validation::require_fields,
};

use crate::{
  AppState,
  error::ApiError,
  extract::{ApiJson, ApiPath},
  token::AuthUser,
};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /products`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  _user: AuthUser,
) -> Result<Json<Vec<Product>>, ApiError>
where
  S: InventoryStore + Clone + 'static,
{
  let products = state
    .store
    .list_products()
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(products))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /products`.
#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name:              Option<String>,
  pub sku:               Option<String>,
  pub description:       Option<String>,
  pub price:             Option<f64>,
  pub quantity_in_stock: Option<i64>,
  pub supplier_id:       Option<i64>,
}

impl TryFrom<CreateBody> for NewProduct {
  type Error = DomainError;

  fn try_from(b: CreateBody) -> Result<Self, Self::Error> {
    // Numbers only need to be present; range checks happen in the store.
    require_fields(&[
      ("name", b.name.as_deref()),
      ("sku", b.sku.as_deref()),
      ("price", b.price.map(|_| "set")),
      ("quantity_in_stock", b.quantity_in_stock.map(|_| "set")),
    ])?;

    Ok(NewProduct {
      name:              b.name.unwrap_or_default(),
      sku:               b.sku.unwrap_or_default(),
      description:       b.description,
      price:             b.price.unwrap_or_default(),
      quantity_in_stock: b.quantity_in_stock.unwrap_or_default(),
      supplier_id:       b.supplier_id,
    })
  }
}

/// `POST /products`: returns 201 + the stored [`Product`].
pub async fn create<S>(
  State(state): State<AppState<S>>,
  _user: AuthUser,
  ApiJson(body): ApiJson<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: InventoryStore + Clone + 'static,
{
  let input = NewProduct::try_from(body)?;
  let product = state
    .store
    .create_product(input)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(product)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /products/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  _user: AuthUser,
  ApiPath(id): ApiPath<i64>,
) -> Result<Json<Product>, ApiError>
where
  S: InventoryStore + Clone + 'static,
{
  let product = state
    .store
    .get_product(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or(DomainError::ProductNotFound(id))?;
  Ok(Json(product))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /products/:id`: returns the updated [`Product`].
pub async fn update<S>(
  State(state): State<AppState<S>>,
  _user: AuthUser,
  ApiPath(id): ApiPath<i64>,
  ApiJson(patch): ApiJson<ProductPatch>,
) -> Result<Json<Product>, ApiError>
where
  S: InventoryStore + Clone + 'static,
{
  let product = state
    .store
    .update_product(id, patch)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(product))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /products/:id`
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
    .delete_product(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(json!({ "message": format!("product {id} deleted") })))
}
