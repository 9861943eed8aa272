use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::auth::{
  entities::{User, UserRole, UserStatus},
  errors::{AuthError, RepositoryError},
  ports::UserRepository,
  value_objects::Email,
};

const USER_COLUMNS: &str = r#"
    id,
    email,
    first_name,
    last_name,
    password_hash,
    refresh_token_hash,
    role,
    status,
    email_verified,
    gdpr_consent,
    gdpr_consent_date,
    marketing_consent,
    marketing_consent_date,
    anonymized,
    anonymized_at,
    last_login_at,
    last_login_ip,
    failed_login_attempts,
    locked_until,
    created_at,
    updated_at,
    deleted_at
"#;

/// PostgreSQL implementation of the UserRepository trait
pub struct PostgresUserRepository {
  pool: PgPool,
}

impl PostgresUserRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

/// Database row structure for the users table
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
  id: Uuid,
  email: String,
  first_name: String,
  last_name: String,
  password_hash: String,
  refresh_token_hash: Option<String>,
  role: UserRole,
  status: UserStatus,
  email_verified: bool,
  gdpr_consent: bool,
  gdpr_consent_date: Option<DateTime<Utc>>,
  marketing_consent: bool,
  marketing_consent_date: Option<DateTime<Utc>>,
  anonymized: bool,
  anonymized_at: Option<DateTime<Utc>>,
  last_login_at: Option<DateTime<Utc>>,
  last_login_ip: Option<String>,
  failed_login_attempts: i32,
  locked_until: Option<DateTime<Utc>>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
  deleted_at: Option<DateTime<Utc>>,
}

impl From<UserRow> for User {
  fn from(row: UserRow) -> Self {
    User {
      id: row.id,
      email: row.email,
      first_name: row.first_name,
      last_name: row.last_name,
      password_hash: row.password_hash,
      refresh_token_hash: row.refresh_token_hash,
      role: row.role,
      status: row.status,
      email_verified: row.email_verified,
      gdpr_consent: row.gdpr_consent,
      gdpr_consent_date: row.gdpr_consent_date,
      marketing_consent: row.marketing_consent,
      marketing_consent_date: row.marketing_consent_date,
      anonymized: row.anonymized,
      anonymized_at: row.anonymized_at,
      last_login_at: row.last_login_at,
      last_login_ip: row.last_login_ip,
      failed_login_attempts: row.failed_login_attempts,
      locked_until: row.locked_until,
      created_at: row.created_at,
      updated_at: row.updated_at,
      deleted_at: row.deleted_at,
    }
  }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
  async fn create(&self, user: User) -> Result<User, AuthError> {
    let result = sqlx::query_as::<_, UserRow>(&format!(
      r#"
            INSERT INTO users (
                id, email, first_name, last_name, password_hash,
                refresh_token_hash, role, status, email_verified,
                gdpr_consent, gdpr_consent_date,
                marketing_consent, marketing_consent_date,
                anonymized, anonymized_at,
                last_login_at, last_login_ip,
                failed_login_attempts, locked_until,
                created_at, updated_at, deleted_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                    $12, $13, $14, $15, $16, $17, $18, $19, $20, $21, $22)
            RETURNING {USER_COLUMNS}
            "#
    ))
    .bind(user.id)
    .bind(&user.email)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.password_hash)
    .bind(&user.refresh_token_hash)
    .bind(user.role)
    .bind(user.status)
    .bind(user.email_verified)
    .bind(user.gdpr_consent)
    .bind(user.gdpr_consent_date)
    .bind(user.marketing_consent)
    .bind(user.marketing_consent_date)
    .bind(user.anonymized)
    .bind(user.anonymized_at)
    .bind(user.last_login_at)
    .bind(&user.last_login_ip)
    .bind(user.failed_login_attempts)
    .bind(user.locked_until)
    .bind(user.created_at)
    .bind(user.updated_at)
    .bind(user.deleted_at)
    .fetch_one(&self.pool)
    .await?;

    Ok(result.into())
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
    let result = sqlx::query_as::<_, UserRow>(&format!(
      r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE id = $1 AND deleted_at IS NULL
            "#
    ))
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    Ok(result.map(Into::into))
  }

  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError> {
    let result = sqlx::query_as::<_, UserRow>(&format!(
      r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE email = $1 AND deleted_at IS NULL
            "#
    ))
    .bind(email.as_str())
    .fetch_optional(&self.pool)
    .await?;

    Ok(result.map(Into::into))
  }

  async fn update(&self, user: User) -> Result<User, AuthError> {
    let result = sqlx::query_as::<_, UserRow>(&format!(
      r#"
            UPDATE users
            SET
                email = $2,
                first_name = $3,
                last_name = $4,
                password_hash = $5,
                refresh_token_hash = $6,
                role = $7,
                status = $8,
                email_verified = $9,
                gdpr_consent = $10,
                gdpr_consent_date = $11,
                marketing_consent = $12,
                marketing_consent_date = $13,
                anonymized = $14,
                anonymized_at = $15,
                last_login_at = $16,
                last_login_ip = $17,
                failed_login_attempts = $18,
                locked_until = $19,
                updated_at = $20
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {USER_COLUMNS}
            "#
    ))
    .bind(user.id)
    .bind(&user.email)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.password_hash)
    .bind(&user.refresh_token_hash)
    .bind(user.role)
    .bind(user.status)
    .bind(user.email_verified)
    .bind(user.gdpr_consent)
    .bind(user.gdpr_consent_date)
    .bind(user.marketing_consent)
    .bind(user.marketing_consent_date)
    .bind(user.anonymized)
    .bind(user.anonymized_at)
    .bind(user.last_login_at)
    .bind(&user.last_login_ip)
    .bind(user.failed_login_attempts)
    .bind(user.locked_until)
    .bind(user.updated_at)
    .fetch_one(&self.pool)
    .await;

    match result {
      Ok(row) => Ok(row.into()),
      Err(sqlx::Error::RowNotFound) => Err(AuthError::Repository(RepositoryError::NotFound)),
      Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
        Err(AuthError::EmailAlreadyExists)
      }
      Err(e) => Err(e.into()),
    }
  }

  async fn update_refresh_token(
    &self,
    id: Uuid,
    refresh_token_hash: Option<&str>,
  ) -> Result<(), AuthError> {
    let result = sqlx::query(
      r#"
            UPDATE users
            SET refresh_token_hash = $2, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
    )
    .bind(id)
    .bind(refresh_token_hash)
    .execute(&self.pool)
    .await?;

    if result.rows_affected() == 0 {
      return Err(AuthError::Repository(RepositoryError::NotFound));
    }
    Ok(())
  }

  async fn rotate_refresh_token(
    &self,
    id: Uuid,
    expected_hash: &str,
    new_hash: &str,
  ) -> Result<bool, AuthError> {
    // Conditional update: the row is only touched when the stored hash is
    // still the one this caller verified, so concurrent redemptions of the
    // same token cannot both win
    let result = sqlx::query(
      r#"
            UPDATE users
            SET refresh_token_hash = $3, updated_at = NOW()
            WHERE id = $1 AND refresh_token_hash = $2 AND deleted_at IS NULL
            "#,
    )
    .bind(id)
    .bind(expected_hash)
    .bind(new_hash)
    .execute(&self.pool)
    .await?;

    Ok(result.rows_affected() == 1)
  }

  async fn soft_delete(&self, id: Uuid) -> Result<(), AuthError> {
    let result = sqlx::query(
      r#"
            UPDATE users
            SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
    )
    .bind(id)
    .execute(&self.pool)
    .await?;

    if result.rows_affected() == 0 {
      return Err(AuthError::Repository(RepositoryError::NotFound));
    }
    Ok(())
  }
}
