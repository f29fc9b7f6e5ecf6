//! Encoding and decoding helpers between Rust domain types and SQLite rows.
//!
//! Timestamps are stored as RFC 3339 strings and decoded outside the
//! connection thread; rows without timestamps map straight onto domain types.

use chrono::{DateTime, Utc};
use rusqlite::Row;
use stockroom_core::{
  product::Product,
  sale::{Receipt, Sale},
  stock::{StockSummary, StockTotals},
  supplier::Supplier,
  user::User,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Plain rows ──────────────────────────────────────────────────────────────

pub const USER_COLUMNS: &str = "id, name, email, phone_number, password_hash";

pub fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
  Ok(User {
    id:            row.get(0)?,
    name:          row.get(1)?,
    email:         row.get(2)?,
    phone_number:  row.get(3)?,
    password_hash: row.get(4)?,
  })
}

pub const SUPPLIER_COLUMNS: &str = "id, name, contact";

pub fn supplier_from_row(row: &Row<'_>) -> rusqlite::Result<Supplier> {
  Ok(Supplier {
    id:      row.get(0)?,
    name:    row.get(1)?,
    contact: row.get(2)?,
  })
}

pub const PRODUCT_COLUMNS: &str =
  "id, name, sku, description, price, quantity_in_stock, supplier_id";

pub fn product_from_row(row: &Row<'_>) -> rusqlite::Result<Product> {
  Ok(Product {
    id:                row.get(0)?,
    name:              row.get(1)?,
    sku:               row.get(2)?,
    description:       row.get(3)?,
    price:             row.get(4)?,
    quantity_in_stock: row.get(5)?,
    supplier_id:       row.get(6)?,
  })
}

// ─── Timestamped rows ────────────────────────────────────────────────────────

pub const SALE_COLUMNS: &str =
  "id, product_id, product_name, quantity_sold, total_price, sold_at, receipt_id";

/// A `sales` row with its timestamp still encoded.
pub struct RawSale {
  pub id:            i64,
  pub product_id:    Option<i64>,
  pub product_name:  String,
  pub quantity_sold: i64,
  pub total_price:   f64,
  pub sold_at:       String,
  pub receipt_id:    Option<i64>,
}

impl RawSale {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      product_id:    row.get(1)?,
      product_name:  row.get(2)?,
      quantity_sold: row.get(3)?,
      total_price:   row.get(4)?,
      sold_at:       row.get(5)?,
      receipt_id:    row.get(6)?,
    })
  }

  pub fn into_sale(self) -> Result<Sale> {
    Ok(Sale {
      id:            self.id,
      product_id:    self.product_id,
      product_name:  self.product_name,
      quantity_sold: self.quantity_sold,
      total_price:   self.total_price,
      sold_at:       decode_dt(&self.sold_at)?,
      receipt_id:    self.receipt_id,
    })
  }
}

pub const RECEIPT_COLUMNS: &str = "id, sale_id, total_amount, issued_at";

pub struct RawReceipt {
  pub id:           i64,
  pub sale_id:      i64,
  pub total_amount: f64,
  pub issued_at:    String,
}

impl RawReceipt {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      sale_id:      row.get(1)?,
      total_amount: row.get(2)?,
      issued_at:    row.get(3)?,
    })
  }

  pub fn into_receipt(self) -> Result<Receipt> {
    Ok(Receipt {
      id:           self.id,
      sale_id:      self.sale_id,
      total_amount: self.total_amount,
      issued_at:    decode_dt(&self.issued_at)?,
    })
  }
}

pub const SUMMARY_COLUMNS: &str = "id, product_id, total_stock_value, \
                                   total_sold_value, total_unsold_value, \
                                   updated_at";

pub struct RawSummary {
  pub id:                 i64,
  pub product_id:         i64,
  pub total_stock_value:  f64,
  pub total_sold_value:   f64,
  pub total_unsold_value: f64,
  pub updated_at:         String,
}

impl RawSummary {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                 row.get(0)?,
      product_id:         row.get(1)?,
      total_stock_value:  row.get(2)?,
      total_sold_value:   row.get(3)?,
      total_unsold_value: row.get(4)?,
      updated_at:         row.get(5)?,
    })
  }

  pub fn into_summary(self) -> Result<StockSummary> {
    Ok(StockSummary {
      id:         self.id,
      product_id: self.product_id,
      totals:     StockTotals {
        total_stock_value:  self.total_stock_value,
        total_sold_value:   self.total_sold_value,
        total_unsold_value: self.total_unsold_value,
      },
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}
