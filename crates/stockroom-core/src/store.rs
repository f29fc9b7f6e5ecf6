//! The `InventoryStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `stockroom-store-sqlite`). The HTTP layer depends on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use crate::{
  Error,
  product::{NewProduct, Product, ProductPatch},
  sale::{NewSale, Receipt, RecordedSale, Sale},
  stock::StockSummary,
  supplier::{NewSupplier, Supplier, SupplierPatch},
  user::{NewUser, User},
};

// ─── Error contract ──────────────────────────────────────────────────────────

/// Backend errors must expose the domain failure they carry, if any, so that
/// callers can tell "not found" from "disk full".
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// The categorical domain error behind this failure, or `None` for
  /// infrastructure failures.
  fn as_domain(&self) -> Option<&Error>;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over an inventory store backend.
///
/// Lookups return `Ok(None)` for a missing row. Updates and deletes of a
/// missing row fail with the matching `*NotFound` domain error.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait InventoryStore: Send + Sync {
  type Error: StoreError;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a new user. Fails with [`Error::DuplicateName`] or
  /// [`Error::DuplicateEmail`], checked in that order.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Fail with [`Error::DuplicateName`] or [`Error::DuplicateEmail`] if a
  /// user already holds either value. [`Self::create_user`] repeats the check
  /// when it writes.
  fn ensure_user_unique(
    &self,
    name: String,
    email: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn find_user_by_email(
    &self,
    email: String,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  // ── Suppliers ─────────────────────────────────────────────────────────

  fn create_supplier(
    &self,
    input: NewSupplier,
  ) -> impl Future<Output = Result<Supplier, Self::Error>> + Send + '_;

  fn get_supplier(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Supplier>, Self::Error>> + Send + '_;

  fn list_suppliers(
    &self,
  ) -> impl Future<Output = Result<Vec<Supplier>, Self::Error>> + Send + '_;

  fn update_supplier(
    &self,
    id: i64,
    patch: SupplierPatch,
  ) -> impl Future<Output = Result<Supplier, Self::Error>> + Send + '_;

  /// Delete a supplier. Products referencing it keep existing with no
  /// supplier.
  fn delete_supplier(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Products ──────────────────────────────────────────────────────────

  /// Persist a new product. Fails with [`Error::DuplicateSku`] or
  /// [`Error::SupplierNotFound`].
  fn create_product(
    &self,
    input: NewProduct,
  ) -> impl Future<Output = Result<Product, Self::Error>> + Send + '_;

  fn get_product(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Product>, Self::Error>> + Send + '_;

  fn list_products(
    &self,
  ) -> impl Future<Output = Result<Vec<Product>, Self::Error>> + Send + '_;

  fn update_product(
    &self,
    id: i64,
    patch: ProductPatch,
  ) -> impl Future<Output = Result<Product, Self::Error>> + Send + '_;

  /// Delete a product and its stock summary. Past sales keep their snapshot
  /// but lose the product reference.
  fn delete_product(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Sales ─────────────────────────────────────────────────────────────

  /// Record a sale atomically: stock decrement, sale row, receipt and stock
  /// summary upsert either all commit or none do.
  ///
  /// Fails with [`Error::InvalidQuantity`], [`Error::ProductNotFound`] or
  /// [`Error::InsufficientStock`].
  fn record_sale(
    &self,
    input: NewSale,
  ) -> impl Future<Output = Result<RecordedSale, Self::Error>> + Send + '_;

  fn get_sale(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Sale>, Self::Error>> + Send + '_;

  fn list_sales(
    &self,
  ) -> impl Future<Output = Result<Vec<Sale>, Self::Error>> + Send + '_;

  fn get_receipt(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Receipt>, Self::Error>> + Send + '_;

  fn get_stock_summary(
    &self,
    product_id: i64,
  ) -> impl Future<Output = Result<Option<StockSummary>, Self::Error>> + Send + '_;

  fn list_stock_summaries(
    &self,
  ) -> impl Future<Output = Result<Vec<StockSummary>, Self::Error>> + Send + '_;
}
