use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User role, lowest privilege first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum UserRole {
  User,
  Admin,
  Superadmin,
}

/// Account status; only `Active` may authenticate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_status", rename_all = "lowercase")]
pub enum UserStatus {
  Active,
  Inactive,
  Suspended,
  Deleted,
}

/// User entity: credentials, lockout counters, consent tracking, audit trail.
///
/// All cross-request state of the authentication core lives on this record;
/// the services mutate it in memory and persist through `UserRepository`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  /// Unique identifier, immutable after creation
  pub id: Uuid,
  /// Unique email, lowercased
  pub email: String,
  pub first_name: String,
  pub last_name: String,
  /// Argon2id digest, never the raw password
  #[serde(skip_serializing)]
  pub password_hash: String,
  /// Digest of the single currently-valid refresh token
  #[serde(skip_serializing)]
  pub refresh_token_hash: Option<String>,
  pub role: UserRole,
  pub status: UserStatus,
  pub email_verified: bool,
  // GDPR consent tracking
  pub gdpr_consent: bool,
  pub gdpr_consent_date: Option<DateTime<Utc>>,
  pub marketing_consent: bool,
  pub marketing_consent_date: Option<DateTime<Utc>>,
  // GDPR anonymization (one-way)
  pub anonymized: bool,
  pub anonymized_at: Option<DateTime<Utc>>,
  // Audit trail, overwritten on each successful sign-in
  pub last_login_at: Option<DateTime<Utc>>,
  pub last_login_ip: Option<String>,
  // Brute-force lockout state; mutated only through LockoutPolicy
  pub failed_login_attempts: i32,
  pub locked_until: Option<DateTime<Utc>>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  /// Soft-delete tombstone; the row is never physically removed
  pub deleted_at: Option<DateTime<Utc>>,
}

/// Fields required to create a new user
pub struct NewUser {
  pub email: String,
  pub password_hash: String,
  pub first_name: String,
  pub last_name: String,
  pub gdpr_consent: bool,
  pub marketing_consent: bool,
}

impl User {
  /// Creates a new active user with the lowest privilege role
  pub fn new(new_user: NewUser, now: DateTime<Utc>) -> Self {
    Self {
      id: Uuid::new_v4(),
      email: new_user.email,
      first_name: new_user.first_name,
      last_name: new_user.last_name,
      password_hash: new_user.password_hash,
      refresh_token_hash: None,
      role: UserRole::User,
      status: UserStatus::Active,
      email_verified: false,
      gdpr_consent: new_user.gdpr_consent,
      gdpr_consent_date: new_user.gdpr_consent.then_some(now),
      marketing_consent: new_user.marketing_consent,
      marketing_consent_date: new_user.marketing_consent.then_some(now),
      anonymized: false,
      anonymized_at: None,
      last_login_at: None,
      last_login_ip: None,
      failed_login_attempts: 0,
      locked_until: None,
      created_at: now,
      updated_at: now,
      deleted_at: None,
    }
  }

  /// Whether the account may authenticate at all
  pub fn is_active(&self) -> bool {
    self.status == UserStatus::Active
  }

  /// Records a successful sign-in on the audit trail
  pub fn record_login(&mut self, now: DateTime<Utc>, ip: Option<String>) {
    self.last_login_at = Some(now);
    self.last_login_ip = ip;
    self.updated_at = now;
  }

  /// Replaces the password digest
  pub fn set_password_hash(&mut self, password_hash: String, now: DateTime<Utc>) {
    self.password_hash = password_hash;
    self.updated_at = now;
  }

  /// Updates the marketing consent flag; the timestamp is set at the moment
  /// consent is granted and cleared when it is withdrawn, never backdated
  pub fn set_marketing_consent(&mut self, consent: bool, now: DateTime<Utc>) {
    self.marketing_consent = consent;
    self.marketing_consent_date = consent.then_some(now);
    self.updated_at = now;
  }

  /// Irreversibly scrubs PII while keeping the row for audit continuity.
  ///
  /// Callers must check `anonymized` first; running this twice is a domain
  /// error, not a no-op.
  pub fn anonymize(&mut self, now: DateTime<Utc>) {
    self.email = format!("deleted_{}@anonymized.local", self.id);
    self.first_name = "Anonymized".to_string();
    self.last_name = "User".to_string();
    self.password_hash = String::new();
    self.refresh_token_hash = None;
    self.last_login_ip = None;
    self.anonymized = true;
    self.anonymized_at = Some(now);
    self.status = UserStatus::Deleted;
    self.updated_at = now;
  }

  /// Sets the account status (administrative suspend/activate)
  pub fn set_status(&mut self, status: UserStatus, now: DateTime<Utc>) {
    self.status = status;
    self.updated_at = now;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample_user(now: DateTime<Utc>) -> User {
    User::new(
      NewUser {
        email: "test@example.com".to_string(),
        password_hash: "$argon2id$v=19$m=65536,t=3,p=4$salt$hash".to_string(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        gdpr_consent: true,
        marketing_consent: false,
      },
      now,
    )
  }

  #[test]
  fn test_new_user_defaults() {
    let now = Utc::now();
    let user = sample_user(now);

    assert_eq!(user.role, UserRole::User);
    assert_eq!(user.status, UserStatus::Active);
    assert_eq!(user.failed_login_attempts, 0);
    assert!(user.locked_until.is_none());
    assert!(user.refresh_token_hash.is_none());
    assert_eq!(user.gdpr_consent_date, Some(now));
    assert!(user.marketing_consent_date.is_none());
    assert!(user.deleted_at.is_none());
  }

  #[test]
  fn test_record_login_overwrites_audit_trail() {
    let now = Utc::now();
    let mut user = sample_user(now);

    user.record_login(now, Some("10.0.0.1".to_string()));
    assert_eq!(user.last_login_at, Some(now));
    assert_eq!(user.last_login_ip.as_deref(), Some("10.0.0.1"));

    let later = now + chrono::Duration::hours(1);
    user.record_login(later, Some("10.0.0.2".to_string()));
    assert_eq!(user.last_login_at, Some(later));
    assert_eq!(user.last_login_ip.as_deref(), Some("10.0.0.2"));
  }

  #[test]
  fn test_marketing_consent_timestamps() {
    let now = Utc::now();
    let mut user = sample_user(now);

    let granted_at = now + chrono::Duration::days(1);
    user.set_marketing_consent(true, granted_at);
    assert_eq!(user.marketing_consent_date, Some(granted_at));

    user.set_marketing_consent(false, granted_at + chrono::Duration::days(1));
    assert!(!user.marketing_consent);
    assert!(user.marketing_consent_date.is_none());
  }

  #[test]
  fn test_anonymize_scrubs_pii() {
    let now = Utc::now();
    let mut user = sample_user(now);
    user.refresh_token_hash = Some("$argon2id$something".to_string());
    user.last_login_ip = Some("10.0.0.1".to_string());

    user.anonymize(now);

    assert_eq!(user.email, format!("deleted_{}@anonymized.local", user.id));
    assert_eq!(user.first_name, "Anonymized");
    assert_eq!(user.last_name, "User");
    assert!(user.password_hash.is_empty());
    assert!(user.refresh_token_hash.is_none());
    assert!(user.last_login_ip.is_none());
    assert!(user.anonymized);
    assert_eq!(user.anonymized_at, Some(now));
    assert_eq!(user.status, UserStatus::Deleted);
  }

  #[test]
  fn test_role_ordering() {
    assert!(UserRole::User < UserRole::Admin);
    assert!(UserRole::Admin < UserRole::Superadmin);
  }

  #[test]
  fn test_password_hash_not_serialized() {
    let user = sample_user(Utc::now());
    let json = serde_json::to_string(&user).unwrap();
    assert!(!json.contains("password_hash"));
    assert!(!json.contains("refresh_token_hash"));
  }
}
