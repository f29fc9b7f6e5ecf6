//! Input validation rules shared by the HTTP layer and the store.

use crate::{Error, Result};

pub const MIN_PASSWORD_LEN: usize = 8;

/// Collect the names of required fields that are absent or blank.
///
/// Returns [`Error::MissingFields`] listing every missing field, in the order
/// given, or `Ok(())` if all are present.
pub fn require_fields(fields: &[(&str, Option<&str>)]) -> Result<()> {
  let missing: Vec<&str> = fields
    .iter()
    .filter(|(_, v)| v.is_none_or(|s| s.trim().is_empty()))
    .map(|(name, _)| *name)
    .collect();

  if missing.is_empty() {
    Ok(())
  } else {
    Err(Error::MissingFields(missing.join(", ")))
  }
}

/// A single required text field must not be blank.
pub fn require_text(field: &str, value: &str) -> Result<()> {
  require_fields(&[(field, Some(value))])
}

/// Passwords must be ASCII letters and digits only, at least
/// [`MIN_PASSWORD_LEN`] long, with at least one letter and one digit.
pub fn validate_password(password: &str) -> Result<()> {
  let long_enough = password.len() >= MIN_PASSWORD_LEN;
  let alphanumeric = password.chars().all(|c| c.is_ascii_alphanumeric());
  let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
  let has_digit = password.chars().any(|c| c.is_ascii_digit());

  if long_enough && alphanumeric && has_letter && has_digit {
    Ok(())
  } else {
    Err(Error::InvalidPassword)
  }
}

pub fn validate_price(price: f64) -> Result<()> {
  if price.is_finite() && price > 0.0 {
    Ok(())
  } else {
    Err(Error::InvalidPrice(price))
  }
}

pub fn validate_stock_quantity(qty: i64) -> Result<()> {
  if qty >= 0 {
    Ok(())
  } else {
    Err(Error::InvalidQuantity {
      field: "quantity_in_stock",
      rule:  "zero or more",
      value: qty,
    })
  }
}

pub fn validate_sale_quantity(qty: i64) -> Result<()> {
  if qty > 0 {
    Ok(())
  } else {
    Err(Error::InvalidQuantity {
      field: "quantity_sold",
      rule:  "greater than zero",
      value: qty,
    })
  }
}
