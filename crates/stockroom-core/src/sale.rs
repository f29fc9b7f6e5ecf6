//! Sales and their receipts.
//!
//! Both are immutable once written. A receipt is created exactly once per
//! sale, in the same transaction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::stock::StockSummary;

/// A recorded sale of a single product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
  pub id:            i64,
  /// `None` once the product has been deleted.
  pub product_id:    Option<i64>,
  /// The product's name at the time of sale.
  pub product_name:  String,
  pub quantity_sold: i64,
  /// `price × quantity_sold`, fixed at the time of sale.
  pub total_price:   f64,
  pub sold_at:       DateTime<Utc>,
  pub receipt_id:    Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
  pub id:           i64,
  pub sale_id:      i64,
  /// Always equal to the sale's `total_price`.
  pub total_amount: f64,
  pub issued_at:    DateTime<Utc>,
}

/// Input to [`crate::store::InventoryStore::record_sale`].
#[derive(Debug, Clone, Copy)]
pub struct NewSale {
  pub product_id:    i64,
  pub quantity_sold: i64,
}

/// Everything written by one successful sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedSale {
  pub sale:    Sale,
  pub receipt: Receipt,
  pub summary: StockSummary,
}

/// Total price of `quantity` units at `unit_price`.
pub fn sale_total(unit_price: f64, quantity: i64) -> f64 {
  unit_price * quantity as f64
}
