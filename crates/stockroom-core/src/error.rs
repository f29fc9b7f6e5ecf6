//! Error types for `stockroom-core`.
//!
//! Every variant is a categorical, request-terminal failure. The HTTP layer
//! maps them onto status codes via [`Error::kind`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("missing required fields: {0}")]
  MissingFields(String),

  #[error("name already exists!")]
  DuplicateName(String),

  #[error("email already exists!")]
  DuplicateEmail(String),

  #[error("sku already exists: {0}")]
  DuplicateSku(String),

  #[error(
    "password must be at least 8 characters long and contain both letters \
     and numbers"
  )]
  InvalidPassword,

  #[error("invalid email or password")]
  InvalidCredentials,

  #[error("price must be greater than zero, got {0}")]
  InvalidPrice(f64),

  #[error("{field} must be {rule}, got {value}")]
  InvalidQuantity {
    field: &'static str,
    rule:  &'static str,
    value: i64,
  },

  #[error("product not found: {0}")]
  ProductNotFound(i64),

  #[error("supplier not found: {0}")]
  SupplierNotFound(i64),

  #[error("sale not found: {0}")]
  SaleNotFound(i64),

  #[error("receipt not found: {0}")]
  ReceiptNotFound(i64),

  #[error("stock summary not found for product {0}")]
  StockSummaryNotFound(i64),

  #[error(
    "insufficient stock for product {product_id}: requested {requested}, \
     available {available}"
  )]
  InsufficientStock {
    product_id: i64,
    requested:  i64,
    available:  i64,
  },
}

/// Coarse classification of an [`Error`], used by transport layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// The referenced entity does not exist.
  NotFound,
  /// The caller could not be authenticated.
  Unauthorized,
  /// The request was well-formed but violates a rule.
  Invalid,
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::ProductNotFound(_)
      | Self::SupplierNotFound(_)
      | Self::SaleNotFound(_)
      | Self::ReceiptNotFound(_)
      | Self::StockSummaryNotFound(_) => ErrorKind::NotFound,
      Self::InvalidCredentials => ErrorKind::Unauthorized,
      Self::MissingFields(_)
      | Self::DuplicateName(_)
      | Self::DuplicateEmail(_)
      | Self::DuplicateSku(_)
      | Self::InvalidPassword
      | Self::InvalidPrice(_)
      | Self::InvalidQuantity { .. }
      | Self::InsufficientStock { .. } => ErrorKind::Invalid,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
