use argon2::password_hash::SaltString;
use argon2::{
  Algorithm, Argon2, Params, Version,
  password_hash::{
    PasswordHash as Argon2PasswordHash, PasswordHasher as Argon2PasswordHasherTrait,
    PasswordVerifier,
  },
};
use async_trait::async_trait;

use crate::domain::auth::errors::{AuthError, HashError};
use crate::domain::auth::ports::PasswordHasher;
use crate::domain::auth::value_objects::PasswordHash;

/// Argon2id hasher for passwords and refresh tokens at rest
///
/// Parameters:
/// - Memory cost: 64 MiB (65536 KiB)
/// - Time cost: 3 iterations
/// - Parallelism: 4 threads
pub struct Argon2Hasher {
  argon2: Argon2<'static>,
}

impl Argon2Hasher {
  pub fn new() -> Result<Self, AuthError> {
    let params = Params::new(65536, 3, 4, Some(32)).map_err(|e| {
      AuthError::Hash(HashError::HashingFailed(format!(
        "Failed to create Argon2 params: {}",
        e
      )))
    })?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    Ok(Self { argon2 })
  }
}

#[async_trait]
impl PasswordHasher for Argon2Hasher {
  /// Hashes a plaintext secret with a fresh OS-random salt
  async fn hash(&self, plaintext: &str) -> Result<PasswordHash, AuthError> {
    let salt = SaltString::generate(&mut rand::rngs::OsRng);

    let hash = self
      .argon2
      .hash_password(plaintext.as_bytes(), &salt)
      .map_err(|e| {
        AuthError::Hash(HashError::HashingFailed(format!(
          "Failed to hash secret: {}",
          e
        )))
      })?;

    PasswordHash::from_hash(hash.to_string()).map_err(|e| {
      AuthError::Hash(HashError::HashingFailed(format!(
        "Invalid hash format: {}",
        e
      )))
    })
  }

  /// Verifies a plaintext secret against a stored PHC digest
  ///
  /// A digest that does not parse is treated as a non-match rather than an
  /// error, so corrupted rows fail closed on the credential path.
  async fn verify(&self, digest: &str, plaintext: &str) -> Result<bool, AuthError> {
    let parsed = match Argon2PasswordHash::new(digest) {
      Ok(parsed) => parsed,
      Err(_) => return Ok(false),
    };

    // verify_password compares in constant time
    match self.argon2.verify_password(plaintext.as_bytes(), &parsed) {
      Ok(()) => Ok(true),
      Err(argon2::password_hash::Error::Password) => Ok(false),
      Err(e) => Err(AuthError::Hash(HashError::HashingFailed(format!(
        "Verification failed: {}",
        e
      )))),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  // The production parameters make each hash take hundreds of milliseconds,
  // so the tests run a handful of operations, not a matrix

  #[tokio::test]
  async fn test_hash_produces_argon2id_digest() {
    let hasher = Argon2Hasher::new().unwrap();

    let hash = hasher.hash("test_password_123").await.unwrap();
    assert!(hash.as_str().starts_with("$argon2id$"));
    assert!(hash.as_str().contains("m=65536,t=3,p=4"));
  }

  #[tokio::test]
  async fn test_verify_round_trip() {
    let hasher = Argon2Hasher::new().unwrap();

    let hash = hasher.hash("test_password_123").await.unwrap();
    assert!(hasher.verify(hash.as_str(), "test_password_123").await.unwrap());
    assert!(!hasher.verify(hash.as_str(), "wrong_password").await.unwrap());
  }

  #[tokio::test]
  async fn test_same_input_gets_distinct_salts() {
    let hasher = Argon2Hasher::new().unwrap();

    let hash1 = hasher.hash("test_password_123").await.unwrap();
    let hash2 = hasher.hash("test_password_123").await.unwrap();
    assert_ne!(hash1.as_str(), hash2.as_str());
  }

  #[tokio::test]
  async fn test_malformed_digest_is_a_non_match() {
    let hasher = Argon2Hasher::new().unwrap();

    let result = hasher.verify("not-a-phc-string", "anything").await;
    assert!(matches!(result, Ok(false)));
  }
}
