//! Per-product stock summaries and the arithmetic that maintains them.
//!
//! A summary is a denormalised set of running totals, updated incrementally
//! inside the sale transaction. It is never recomputed from history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The three running totals carried by a [`StockSummary`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockTotals {
  pub total_stock_value:  f64,
  pub total_sold_value:   f64,
  pub total_unsold_value: f64,
}

impl StockTotals {
  /// Totals for a product's first recorded sale.
  ///
  /// The stock value starts at the negative of the amount just sold; the
  /// unsold value is what the remaining stock is worth at `unit_price`.
  pub fn opening(sale_amount: f64, unit_price: f64, remaining: i64) -> Self {
    Self {
      total_stock_value:  -sale_amount,
      total_sold_value:   sale_amount,
      total_unsold_value: unit_price * remaining as f64,
    }
  }

  /// Fold one more sale into existing totals.
  pub fn apply_sale(self, sale_amount: f64, unit_price: f64, remaining: i64) -> Self {
    Self {
      total_stock_value:  self.total_stock_value - sale_amount,
      total_sold_value:   self.total_sold_value + sale_amount,
      total_unsold_value: unit_price * remaining as f64,
    }
  }

  /// Opening totals if `existing` is `None`, otherwise `existing` advanced by
  /// one sale.
  pub fn after_sale(
    existing: Option<Self>,
    sale_amount: f64,
    unit_price: f64,
    remaining: i64,
  ) -> Self {
    match existing {
      Some(totals) => totals.apply_sale(sale_amount, unit_price, remaining),
      None => Self::opening(sale_amount, unit_price, remaining),
    }
  }
}

/// One row per product that has been sold at least once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockSummary {
  pub id:         i64,
  pub product_id: i64,
  #[serde(flatten)]
  pub totals:     StockTotals,
  pub updated_at: DateTime<Utc>,
}
