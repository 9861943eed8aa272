use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entities::{User, UserRole};
use super::errors::AuthError;
use super::value_objects::{Email, PasswordHash};

/// Repository trait for user persistence operations (the credential store)
#[async_trait]
pub trait UserRepository: Send + Sync {
  /// Creates a new user in the repository
  async fn create(&self, user: User) -> Result<User, AuthError>;

  /// Finds a user by their unique identifier
  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError>;

  /// Finds a user by their email address
  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError>;

  /// Updates an existing user
  async fn update(&self, user: User) -> Result<User, AuthError>;

  /// Unconditionally replaces the stored refresh-token hash
  /// (`None` clears the slot, as on sign-out)
  async fn update_refresh_token(
    &self,
    id: Uuid,
    refresh_token_hash: Option<&str>,
  ) -> Result<(), AuthError>;

  /// Atomically replaces the refresh-token hash only if the stored value
  /// still equals `expected_hash`. Returns `false` when another rotation won
  /// the race, which the caller must treat as a spent token.
  async fn rotate_refresh_token(
    &self,
    id: Uuid,
    expected_hash: &str,
    new_hash: &str,
  ) -> Result<bool, AuthError>;

  /// Soft deletes a user (marks as deleted without removing from database)
  async fn soft_delete(&self, id: Uuid) -> Result<(), AuthError>;
}

/// Service trait for password hashing operations.
///
/// Also used to hash refresh tokens at rest, so the plaintext side is a
/// plain `&str` rather than the `Password` value object.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
  /// Hashes a plaintext value with a fresh salt; two calls on the same
  /// input produce different digests
  async fn hash(&self, plaintext: &str) -> Result<PasswordHash, AuthError>;

  /// Verifies a plaintext value against a stored digest. A malformed digest
  /// is reported as `Ok(false)`, never as an error.
  async fn verify(&self, digest: &str, plaintext: &str) -> Result<bool, AuthError>;
}

/// The two bearer token classes. They are signed with independent secrets
/// and a refresh token is never accepted where an access token is expected,
/// or vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
  Access,
  Refresh,
}

/// Claims carried by both token kinds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
  /// User id
  pub sub: Uuid,
  pub email: String,
  pub role: UserRole,
  pub kind: TokenKind,
  pub iat: i64,
  pub exp: i64,
}

/// Service trait for minting and verifying the access/refresh token pair
pub trait TokenIssuer: Send + Sync {
  /// Mints a short-lived access token
  fn issue_access(&self, user: &User) -> Result<String, AuthError>;

  /// Mints a long-lived refresh token
  fn issue_refresh(&self, user: &User) -> Result<String, AuthError>;

  /// Verifies signature, expiry and kind; a kind mismatch is rejected even
  /// when the signature is valid
  fn verify(&self, token: &str, expected_kind: TokenKind) -> Result<TokenClaims, AuthError>;

  /// Access token lifetime, reported to clients as `expires_in`
  fn access_ttl_seconds(&self) -> u64;
}

/// Injectable time source so lockout and expiry logic is testable without
/// real time passing
pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<Utc>;
}

/// Structured audit event actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
  UserSignup,
  UserLogin,
  UserLogout,
  LoginFailed,
  ProfileUpdated,
  MarketingConsentUpdated,
  UserAnonymized,
  DataExportRequested,
  AccountDeleted,
  AccountSuspended,
  AccountActivated,
}

impl AuditAction {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::UserSignup => "USER_SIGNUP",
      Self::UserLogin => "USER_LOGIN",
      Self::UserLogout => "USER_LOGOUT",
      Self::LoginFailed => "LOGIN_FAILED",
      Self::ProfileUpdated => "PROFILE_UPDATED",
      Self::MarketingConsentUpdated => "MARKETING_CONSENT_UPDATED",
      Self::UserAnonymized => "USER_ANONYMIZED",
      Self::DataExportRequested => "DATA_EXPORT_REQUESTED",
      Self::AccountDeleted => "ACCOUNT_DELETED",
      Self::AccountSuspended => "ACCOUNT_SUSPENDED",
      Self::AccountActivated => "ACCOUNT_ACTIVATED",
    }
  }
}

/// Fire-and-forget audit event sink. The core emits events; storage and
/// shipping are the implementation's concern.
pub trait AuditSink: Send + Sync {
  fn emit(&self, action: AuditAction, user_id: Uuid, details: serde_json::Value);
}
