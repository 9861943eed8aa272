use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use super::entities::{NewUser, User, UserRole};
use super::errors::AuthError;
use super::lockout::LockoutPolicy;
use super::ports::{AuditAction, AuditSink, Clock, PasswordHasher, TokenIssuer, TokenKind, UserRepository};
use super::value_objects::{Email, Password, PasswordHash};

/// Configuration for the authentication service
#[derive(Debug, Clone, Copy)]
pub struct AuthServiceConfig {
  pub max_failed_attempts: i32,
  pub lockout_minutes: i64,
}

impl Default for AuthServiceConfig {
  fn default() -> Self {
    Self {
      max_failed_attempts: LockoutPolicy::DEFAULT_MAX_FAILED_ATTEMPTS,
      lockout_minutes: LockoutPolicy::DEFAULT_LOCKOUT_MINUTES,
    }
  }
}

/// Public slice of the user returned to clients. Never carries the password
/// digest or the refresh-token hash.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
  pub id: Uuid,
  pub email: String,
  pub first_name: String,
  pub last_name: String,
  pub role: UserRole,
}

impl From<&User> for PublicUser {
  fn from(user: &User) -> Self {
    Self {
      id: user.id,
      email: user.email.clone(),
      first_name: user.first_name.clone(),
      last_name: user.last_name.clone(),
      role: user.role,
    }
  }
}

/// Successful authentication payload. The raw refresh token is handed out
/// exactly once here; only its hash exists at rest afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
  pub access_token: String,
  pub refresh_token: String,
  pub token_type: String,
  pub expires_in: u64,
  pub user: PublicUser,
}

/// Input for `sign_up`
#[derive(Debug, Clone)]
pub struct SignUpRequest {
  pub email: String,
  pub password: String,
  pub first_name: String,
  pub last_name: String,
  pub gdpr_consent: bool,
  pub marketing_consent: bool,
}

/// Authentication and session-lifecycle service.
///
/// Orchestrates sign-up, sign-in, refresh rotation and sign-out over one
/// user record per operation, composing the credential store, the password
/// hasher, the lockout policy and the token issuer.
pub struct AuthService {
  user_repo: Arc<dyn UserRepository>,
  password_hasher: Arc<dyn PasswordHasher>,
  token_issuer: Arc<dyn TokenIssuer>,
  clock: Arc<dyn Clock>,
  audit: Arc<dyn AuditSink>,
  lockout: LockoutPolicy,
}

impl AuthService {
  pub fn new(
    user_repo: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    token_issuer: Arc<dyn TokenIssuer>,
    clock: Arc<dyn Clock>,
    audit: Arc<dyn AuditSink>,
    config: AuthServiceConfig,
  ) -> Self {
    Self {
      user_repo,
      password_hasher,
      token_issuer,
      clock,
      audit,
      lockout: LockoutPolicy::new(config.max_failed_attempts, config.lockout_minutes),
    }
  }

  /// Registers a new user and opens their first session.
  ///
  /// # Errors
  /// `GdprConsentRequired` without consent, `EmailAlreadyExists` on a
  /// duplicate email (case-insensitive), validation errors on malformed
  /// email or password.
  pub async fn sign_up(&self, request: SignUpRequest) -> Result<AuthResponse, AuthError> {
    if !request.gdpr_consent {
      return Err(AuthError::GdprConsentRequired);
    }

    let email = Email::new(request.email)?;
    let password = Password::new(request.password)?;

    if self.user_repo.find_by_email(&email).await?.is_some() {
      return Err(AuthError::EmailAlreadyExists);
    }

    // Hash explicitly before persisting, guarded against double hashing:
    // a value already carrying the digest prefix is stored as-is
    let password_hash = if PasswordHash::is_hash_format(password.as_str()) {
      PasswordHash::from_hash(password.as_str())?
    } else {
      self.password_hasher.hash(password.as_str()).await?
    };

    let now = self.clock.now();
    let user = User::new(
      NewUser {
        email: email.into_inner(),
        password_hash: password_hash.into_inner(),
        first_name: request.first_name,
        last_name: request.last_name,
        gdpr_consent: request.gdpr_consent,
        marketing_consent: request.marketing_consent,
      },
      now,
    );

    // The storage layer enforces email uniqueness as well; map its unique
    // violation to the same domain error as the pre-check
    let user = match self.user_repo.create(user).await {
      Ok(user) => user,
      Err(AuthError::Repository(super::errors::RepositoryError::DuplicateKey(_))) => {
        return Err(AuthError::EmailAlreadyExists);
      }
      Err(e) => return Err(e),
    };

    self.audit.emit(
      AuditAction::UserSignup,
      user.id,
      json!({
        "email": user.email,
        "gdpr_consent": true,
        "marketing_consent": user.marketing_consent,
      }),
    );

    self.open_session(&user).await
  }

  /// Authenticates a user by email and password.
  ///
  /// Order matters: the lockout check runs before password verification, so
  /// attempts during the lock window neither advance the counter nor extend
  /// the lock. A failed verification persists the incremented counter even
  /// though the operation fails.
  pub async fn sign_in(
    &self,
    email: &str,
    password: &str,
    client_ip: Option<String>,
  ) -> Result<AuthResponse, AuthError> {
    let email = Email::new(email)?;
    let now = self.clock.now();

    // Unknown email is reported exactly like a wrong password
    let mut user = self
      .user_repo
      .find_by_email(&email)
      .await?
      .ok_or(AuthError::InvalidCredentials)?;

    if self.lockout.is_locked(&user, now) {
      tracing::warn!(email = %email, "sign-in attempt on locked account");
      self.audit.emit(
        AuditAction::LoginFailed,
        user.id,
        json!({ "email": user.email, "reason": "locked", "ip": client_ip }),
      );
      return Err(AuthError::AccountLocked);
    }

    if !user.is_active() {
      return Err(AuthError::InvalidCredentials);
    }

    let password_ok = self
      .password_hasher
      .verify(&user.password_hash, password)
      .await?;

    if !password_ok {
      self.lockout.on_failure(&mut user, now);
      let attempts = user.failed_login_attempts;
      self.user_repo.update(user.clone()).await?;

      tracing::warn!(email = %email, attempts, "failed sign-in attempt");
      self.audit.emit(
        AuditAction::LoginFailed,
        user.id,
        json!({ "email": user.email, "attempts": attempts, "ip": client_ip }),
      );
      return Err(AuthError::InvalidCredentials);
    }

    self.lockout.on_success(&mut user, now);
    user.record_login(now, client_ip.clone());
    let user = self.user_repo.update(user).await?;

    self.audit.emit(
      AuditAction::UserLogin,
      user.id,
      json!({ "email": user.email, "ip": client_ip }),
    );

    self.open_session(&user).await
  }

  /// Exchanges a refresh token for a fresh access/refresh pair.
  ///
  /// A token must pass both the signature check and the stored-hash match,
  /// so it dies the instant it is rotated or the user signs out, even while
  /// its signature would still verify. Rotation is an atomic conditional
  /// update; losing that race also spends the token.
  pub async fn refresh(&self, refresh_token: &str) -> Result<AuthResponse, AuthError> {
    let claims = self
      .token_issuer
      .verify(refresh_token, TokenKind::Refresh)
      .map_err(|_| AuthError::InvalidRefreshToken)?;

    let user = self
      .user_repo
      .find_by_id(claims.sub)
      .await?
      .ok_or(AuthError::InvalidRefreshToken)?;

    let stored_hash = user
      .refresh_token_hash
      .clone()
      .ok_or(AuthError::InvalidRefreshToken)?;

    let hash_matches = self
      .password_hasher
      .verify(&stored_hash, refresh_token)
      .await?;
    if !hash_matches {
      return Err(AuthError::InvalidRefreshToken);
    }

    let access_token = self.token_issuer.issue_access(&user)?;
    let new_refresh_token = self.token_issuer.issue_refresh(&user)?;
    let new_hash = self.password_hasher.hash(&new_refresh_token).await?;

    let rotated = self
      .user_repo
      .rotate_refresh_token(user.id, &stored_hash, new_hash.as_str())
      .await?;
    if !rotated {
      // A concurrent refresh redeemed this token first
      return Err(AuthError::InvalidRefreshToken);
    }

    Ok(self.build_response(&user, access_token, new_refresh_token))
  }

  /// Invalidates the current session by clearing the stored refresh hash
  pub async fn sign_out(&self, user_id: Uuid) -> Result<(), AuthError> {
    self.user_repo.update_refresh_token(user_id, None).await?;
    self.audit.emit(AuditAction::UserLogout, user_id, json!({}));
    Ok(())
  }

  /// Shared issuance sub-protocol: mint both tokens, persist the hash of
  /// the refresh token, return the raw pair exactly once
  async fn open_session(&self, user: &User) -> Result<AuthResponse, AuthError> {
    let access_token = self.token_issuer.issue_access(user)?;
    let refresh_token = self.token_issuer.issue_refresh(user)?;

    let refresh_hash = self.password_hasher.hash(&refresh_token).await?;
    self
      .user_repo
      .update_refresh_token(user.id, Some(refresh_hash.as_str()))
      .await?;

    Ok(self.build_response(user, access_token, refresh_token))
  }

  fn build_response(&self, user: &User, access_token: String, refresh_token: String) -> AuthResponse {
    AuthResponse {
      access_token,
      refresh_token,
      token_type: "bearer".to_string(),
      expires_in: self.token_issuer.access_ttl_seconds(),
      user: PublicUser::from(user),
    }
  }
}

#[cfg(test)]
pub(crate) mod test_support {
  use super::*;
  use crate::domain::auth::errors::RepositoryError;
  use crate::domain::auth::ports::TokenClaims;
  use async_trait::async_trait;
  use chrono::{DateTime, Duration, Utc};
  use std::collections::HashMap;
  use std::sync::atomic::{AtomicU64, Ordering};
  use std::sync::Mutex;

  /// In-memory credential store with the same conditional-rotation contract
  /// as the Postgres implementation
  #[derive(Default)]
  pub struct InMemoryUserRepository {
    users: Mutex<HashMap<Uuid, User>>,
  }

  impl InMemoryUserRepository {
    pub fn get(&self, id: Uuid) -> Option<User> {
      self.users.lock().unwrap().get(&id).cloned()
    }
  }

  #[async_trait]
  impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, AuthError> {
      let mut users = self.users.lock().unwrap();
      if users.values().any(|u| u.email == user.email && u.deleted_at.is_none()) {
        return Err(AuthError::Repository(RepositoryError::DuplicateKey(
          user.email.clone(),
        )));
      }
      users.insert(user.id, user.clone());
      Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
      let users = self.users.lock().unwrap();
      Ok(users.get(&id).filter(|u| u.deleted_at.is_none()).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError> {
      let users = self.users.lock().unwrap();
      Ok(
        users
          .values()
          .find(|u| u.email == email.as_str() && u.deleted_at.is_none())
          .cloned(),
      )
    }

    async fn update(&self, user: User) -> Result<User, AuthError> {
      let mut users = self.users.lock().unwrap();
      if !users.contains_key(&user.id) {
        return Err(AuthError::Repository(RepositoryError::NotFound));
      }
      users.insert(user.id, user.clone());
      Ok(user)
    }

    async fn update_refresh_token(
      &self,
      id: Uuid,
      refresh_token_hash: Option<&str>,
    ) -> Result<(), AuthError> {
      let mut users = self.users.lock().unwrap();
      let user = users
        .get_mut(&id)
        .ok_or(AuthError::Repository(RepositoryError::NotFound))?;
      user.refresh_token_hash = refresh_token_hash.map(|h| h.to_string());
      Ok(())
    }

    async fn rotate_refresh_token(
      &self,
      id: Uuid,
      expected_hash: &str,
      new_hash: &str,
    ) -> Result<bool, AuthError> {
      let mut users = self.users.lock().unwrap();
      let user = users
        .get_mut(&id)
        .ok_or(AuthError::Repository(RepositoryError::NotFound))?;
      if user.refresh_token_hash.as_deref() == Some(expected_hash) {
        user.refresh_token_hash = Some(new_hash.to_string());
        Ok(true)
      } else {
        Ok(false)
      }
    }

    async fn soft_delete(&self, id: Uuid) -> Result<(), AuthError> {
      let mut users = self.users.lock().unwrap();
      let user = users
        .get_mut(&id)
        .ok_or(AuthError::Repository(RepositoryError::NotFound))?;
      user.deleted_at = Some(Utc::now());
      Ok(())
    }
  }

  /// Deterministic hasher double keeping the digest prefix contract without
  /// paying the Argon2 cost in every service test
  pub struct StubPasswordHasher;

  #[async_trait]
  impl PasswordHasher for StubPasswordHasher {
    async fn hash(&self, plaintext: &str) -> Result<PasswordHash, AuthError> {
      PasswordHash::from_hash(format!("$argon2id$stub${plaintext}")).map_err(AuthError::from)
    }

    async fn verify(&self, digest: &str, plaintext: &str) -> Result<bool, AuthError> {
      Ok(digest.strip_prefix("$argon2id$stub$") == Some(plaintext))
    }
  }

  /// Token issuer double: opaque sequenced tokens with a claims table
  #[derive(Default)]
  pub struct StubTokenIssuer {
    seq: AtomicU64,
    issued: Mutex<HashMap<String, TokenClaims>>,
  }

  impl StubTokenIssuer {
    fn issue(&self, user: &User, kind: TokenKind) -> String {
      let n = self.seq.fetch_add(1, Ordering::SeqCst);
      let prefix = match kind {
        TokenKind::Access => "access",
        TokenKind::Refresh => "refresh",
      };
      let token = format!("{prefix}.{}.{n}", user.id);
      self.issued.lock().unwrap().insert(
        token.clone(),
        TokenClaims {
          sub: user.id,
          email: user.email.clone(),
          role: user.role,
          kind,
          iat: 0,
          exp: i64::MAX,
        },
      );
      token
    }
  }

  impl TokenIssuer for StubTokenIssuer {
    fn issue_access(&self, user: &User) -> Result<String, AuthError> {
      Ok(self.issue(user, TokenKind::Access))
    }

    fn issue_refresh(&self, user: &User) -> Result<String, AuthError> {
      Ok(self.issue(user, TokenKind::Refresh))
    }

    fn verify(&self, token: &str, expected_kind: TokenKind) -> Result<TokenClaims, AuthError> {
      let issued = self.issued.lock().unwrap();
      let claims = issued
        .get(token)
        .ok_or(AuthError::Token(crate::domain::auth::errors::TokenError::Invalid))?;
      if claims.kind != expected_kind {
        return Err(AuthError::Token(
          crate::domain::auth::errors::TokenError::KindMismatch,
        ));
      }
      Ok(claims.clone())
    }

    fn access_ttl_seconds(&self) -> u64 {
      900
    }
  }

  /// Controllable clock
  pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
  }

  impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
      Self { now: Mutex::new(now) }
    }

    pub fn advance(&self, duration: Duration) {
      let mut now = self.now.lock().unwrap();
      *now += duration;
    }
  }

  impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
      *self.now.lock().unwrap()
    }
  }

  /// Captures emitted audit events for assertions
  #[derive(Default)]
  pub struct RecordingAuditSink {
    pub events: Mutex<Vec<(AuditAction, Uuid)>>,
  }

  impl RecordingAuditSink {
    pub fn actions(&self) -> Vec<AuditAction> {
      self.events.lock().unwrap().iter().map(|(a, _)| *a).collect()
    }
  }

  impl AuditSink for RecordingAuditSink {
    fn emit(&self, action: AuditAction, user_id: Uuid, _details: serde_json::Value) {
      self.events.lock().unwrap().push((action, user_id));
    }
  }
}
