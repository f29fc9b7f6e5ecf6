//! JSON REST API for Stockroom.
//!
//! Exposes an axum [`Router`] backed by any
//! [`stockroom_core::store::InventoryStore`]. TLS, CORS and request tracing
//! are the caller's responsibility; token auth is handled here.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = stockroom_api::api_router(AppState { store, tokens });
//! ```

pub mod auth;
pub mod error;
pub mod extract;
pub mod ledger;
pub mod password;
pub mod products;
pub mod suppliers;
pub mod token;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use stockroom_core::store::InventoryStore;

pub use error::ApiError;
pub use token::TokenIssuer;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: InventoryStore> {
  pub store:  Arc<S>,
  pub tokens: Arc<TokenIssuer>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: InventoryStore + Clone + 'static,
{
  Router::new()
    .route("/", get(index))
    // Auth
    .route("/auth/signup", post(auth::signup::<S>))
    .route("/auth/login", post(auth::login::<S>))
    // Products
    .route("/products", get(products::list::<S>).post(products::create::<S>))
    .route(
      "/products/{id}",
      get(products::get_one::<S>)
        .patch(products::update::<S>)
        .delete(products::delete::<S>),
    )
    // Suppliers
    .route("/suppliers", get(suppliers::list::<S>).post(suppliers::create::<S>))
    .route(
      "/suppliers/{id}",
      get(suppliers::get_one::<S>)
        .patch(suppliers::update::<S>)
        .delete(suppliers::delete::<S>),
    )
    // Sales and derived records
    .route("/sales", get(ledger::list::<S>).post(ledger::record::<S>))
    .route("/sales/{id}", get(ledger::get_one::<S>))
    .route("/receipts/{id}", get(ledger::get_receipt::<S>))
    .route("/stock-summaries", get(ledger::list_summaries::<S>))
    .route("/stock-summaries/{product_id}", get(ledger::get_summary::<S>))
    .with_state(state)
}

async fn index() -> &'static str { "Stockroom inventory service" }

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests;
