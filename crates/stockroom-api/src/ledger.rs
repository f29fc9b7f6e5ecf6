//! Handlers for sales, receipts and stock summaries.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/sales` | All sales |
//! | `POST` | `/sales` | Body: `{"product_id":1,"quantity_sold":3}`; returns 201 |
//! | `GET`  | `/sales/:id` | 404 if not found |
//! | `GET`  | `/receipts/:id` | 404 if not found |
//! | `GET`  | `/stock-summaries` | One row per product sold so far |
//! | `GET`  | `/stock-summaries/:product_id` | 404 if the product was never sold |

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use stockroom_core::{
  Error as DomainError,
  sale::{NewSale, Receipt, Sale},
  stock::StockSummary,
  store::InventoryStore,
  validation::require_fields,
};
use tracing::info;

use crate::{
  AppState,
  error::ApiError,
  extract::{ApiJson, ApiPath},
  token::AuthUser,
};

// ─── Sales ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SaleBody {
  pub product_id:    Option<i64>,
  pub quantity_sold: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaleCreated {
  pub sale_id:     i64,
  pub receipt_id:  i64,
  pub total_price: f64,
}

/// `POST /sales`: records the sale, its receipt and the stock-summary update
/// in one transaction.
pub async fn record<S>(
  State(state): State<AppState<S>>,
  user: AuthUser,
  ApiJson(body): ApiJson<SaleBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: InventoryStore + Clone + 'static,
{
  require_fields(&[
    ("product_id", body.product_id.map(|_| "set")),
    ("quantity_sold", body.quantity_sold.map(|_| "set")),
  ])?;
  let input = NewSale {
    product_id:    body.product_id.unwrap_or_default(),
    quantity_sold: body.quantity_sold.unwrap_or_default(),
  };

  let recorded = state
    .store
    .record_sale(input)
    .await
    .map_err(ApiError::from_store)?;

  info!(
    sale_id = recorded.sale.id,
    product_id = input.product_id,
    quantity = input.quantity_sold,
    total = recorded.sale.total_price,
    user_id = user.user_id,
    "sale recorded"
  );

  Ok((
    StatusCode::CREATED,
    Json(SaleCreated {
      sale_id:     recorded.sale.id,
      receipt_id:  recorded.receipt.id,
      total_price: recorded.sale.total_price,
    }),
  ))
}

/// `GET /sales`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  _user: AuthUser,
) -> Result<Json<Vec<Sale>>, ApiError>
where
  S: InventoryStore + Clone + 'static,
{
  let sales = state.store.list_sales().await.map_err(ApiError::from_store)?;
  Ok(Json(sales))
}

/// `GET /sales/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  _user: AuthUser,
  ApiPath(id): ApiPath<i64>,
) -> Result<Json<Sale>, ApiError>
where
  S: InventoryStore + Clone + 'static,
{
  let sale = state
    .store
    .get_sale(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or(DomainError::SaleNotFound(id))?;
  Ok(Json(sale))
}

// ─── Receipts ─────────────────────────────────────────────────────────────────

/// `GET /receipts/:id`
pub async fn get_receipt<S>(
  State(state): State<AppState<S>>,
  _user: AuthUser,
  ApiPath(id): ApiPath<i64>,
) -> Result<Json<Receipt>, ApiError>
where
  S: InventoryStore + Clone + 'static,
{
  let receipt = state
    .store
    .get_receipt(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or(DomainError::ReceiptNotFound(id))?;
  Ok(Json(receipt))
}

// ─── Stock summaries ──────────────────────────────────────────────────────────

/// `GET /stock-summaries`
pub async fn list_summaries<S>(
  State(state): State<AppState<S>>,
  _user: AuthUser,
) -> Result<Json<Vec<StockSummary>>, ApiError>
where
  S: InventoryStore + Clone + 'static,
{
  let summaries = state
    .store
    .list_stock_summaries()
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(summaries))
}

/// `GET /stock-summaries/:product_id`
pub async fn get_summary<S>(
  State(state): State<AppState<S>>,
  _user: AuthUser,
  ApiPath(product_id): ApiPath<i64>,
) -> Result<Json<StockSummary>, ApiError>
where
  S: InventoryStore + Clone + 'static,
{
  let summary = state
    .store
    .get_stock_summary(product_id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or(DomainError::StockSummaryNotFound(product_id))?;
  Ok(Json(summary))
}
