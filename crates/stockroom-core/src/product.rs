//! Products: the stock-keeping units the inventory tracks.

use serde::{Deserialize, Serialize};

use crate::{
  Result,
  validation::{require_text, validate_price, validate_stock_quantity},
};

/// A product as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  pub id:                i64,
  pub name:              String,
  /// Unique across all products.
  pub sku:               String,
  pub description:       Option<String>,
  /// Unit price; always strictly positive.
  pub price:             f64,
  /// Never negative.
  pub quantity_in_stock: i64,
  pub supplier_id:       Option<i64>,
}

/// Input to [`crate::store::InventoryStore::create_product`].
#[derive(Debug, Clone)]
pub struct NewProduct {
  pub name:              String,
  pub sku:               String,
  pub description:       Option<String>,
  pub price:             f64,
  pub quantity_in_stock: i64,
  pub supplier_id:       Option<i64>,
}

impl NewProduct {
  pub fn validate(&self) -> Result<()> {
    require_text("name", &self.name)?;
    require_text("sku", &self.sku)?;
    validate_price(self.price)?;
    validate_stock_quantity(self.quantity_in_stock)
  }
}

/// A partial update; `None` fields are left untouched.
///
/// A supplier reference can be changed but not cleared through a patch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
  pub name:              Option<String>,
  pub sku:               Option<String>,
  pub description:       Option<String>,
  pub price:             Option<f64>,
  pub quantity_in_stock: Option<i64>,
  pub supplier_id:       Option<i64>,
}

impl ProductPatch {
  pub fn validate(&self) -> Result<()> {
    if let Some(name) = &self.name {
      require_text("name", name)?;
    }
    if let Some(sku) = &self.sku {
      require_text("sku", sku)?;
    }
    if let Some(price) = self.price {
      validate_price(price)?;
    }
    if let Some(qty) = self.quantity_in_stock {
      validate_stock_quantity(qty)?;
    }
    Ok(())
  }

  pub fn apply_to(self, product: &mut Product) {
    if let Some(name) = self.name {
      product.name = name;
    }
    if let Some(sku) = self.sku {
      product.sku = sku;
    }
    if let Some(description) = self.description {
      product.description = Some(description);
    }
    if let Some(price) = self.price {
      product.price = price;
    }
    if let Some(qty) = self.quantity_in_stock {
      product.quantity_in_stock = qty;
    }
    if let Some(supplier_id) = self.supplier_id {
      product.supplier_id = Some(supplier_id);
    }
  }
}
