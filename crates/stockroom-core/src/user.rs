//! User accounts. Created at signup and never mutated afterwards.

use serde::{Deserialize, Serialize};

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub id:            i64,
  pub name:          String,
  pub email:         String,
  pub phone_number:  String,
  /// Argon2 PHC string. Never leaves the server.
  #[serde(skip_serializing, default)]
  pub password_hash: String,
}

/// Input to [`crate::store::InventoryStore::create_user`].
/// The password must already be hashed by the caller.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub name:          String,
  pub email:         String,
  pub phone_number:  String,
  pub password_hash: String,
}
