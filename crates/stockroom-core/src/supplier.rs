//! Suppliers: the parties products are sourced from.

use serde::{Deserialize, Serialize};

use crate::{Result, validation::require_text};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
  pub id:      i64,
  pub name:    String,
  pub contact: String,
}

/// Input to [`crate::store::InventoryStore::create_supplier`].
#[derive(Debug, Clone)]
pub struct NewSupplier {
  pub name:    String,
  pub contact: String,
}

/// A partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SupplierPatch {
  pub name:    Option<String>,
  pub contact: Option<String>,
}

impl SupplierPatch {
  pub fn validate(&self) -> Result<()> {
    if let Some(name) = &self.name {
      require_text("name", name)?;
    }
    if let Some(contact) = &self.contact {
      require_text("contact", contact)?;
    }
    Ok(())
  }

  pub fn apply_to(self, supplier: &mut Supplier) {
    if let Some(name) = self.name {
      supplier.name = name;
    }
    if let Some(contact) = self.contact {
      supplier.contact = contact;
    }
  }
}
