//! Argon2 password hashing.

use std::sync::LazyLock;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use rand_core::OsRng;

use crate::error::ApiError;

/// Hash `password` into an argon2 PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| ApiError::Internal(format!("argon2 error: {e}")))
}

/// `true` if `password` matches the stored PHC string. A malformed stored
/// hash never matches.
pub fn verify_password(password: &str, phc: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(phc) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

static DUMMY_HASH: LazyLock<Option<String>> =
  LazyLock::new(|| hash_password("stockroom-dummy-password").ok());

/// Run one verification against a throwaway hash. Used when login finds no
/// user, so the response costs as much as a wrong password. Always `false`.
pub fn verify_dummy(password: &str) -> bool {
  if let Some(phc) = DUMMY_HASH.as_deref() {
    let _ = verify_password(password, phc);
  }
  false
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hash_then_verify() {
    let phc = hash_password("abcd1234").unwrap();
    assert!(phc.starts_with("$argon2"));
    assert!(verify_password("abcd1234", &phc));
    assert!(!verify_password("abcd12345", &phc));
  }

  #[test]
  fn malformed_hash_never_matches() {
    assert!(!verify_password("abcd1234", "not-a-phc-string"));
  }

  #[test]
  fn dummy_verification_never_matches() {
    assert!(!verify_dummy("stockroom-dummy-password"));
    assert!(!verify_dummy("abcd1234"));
    assert!(DUMMY_HASH.as_deref().is_some_and(|h| h.starts_with("$argon2")));
  }
}
