use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::entities::{User, UserStatus};
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::{AuditAction, AuditSink, Clock, UserRepository};

/// Partial profile update. Absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileRequest {
  pub first_name: Option<String>,
  pub last_name: Option<String>,
  pub marketing_consent: Option<bool>,
}

/// Account-lifecycle operations: profile management and the GDPR surface
/// (anonymization, data export, deletion).
pub struct UserService {
  user_repo: Arc<dyn UserRepository>,
  clock: Arc<dyn Clock>,
  audit: Arc<dyn AuditSink>,
}

impl UserService {
  pub fn new(
    user_repo: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
    audit: Arc<dyn AuditSink>,
  ) -> Self {
    Self {
      user_repo,
      clock,
      audit,
    }
  }

  /// Looks a user up by identifier. Anonymized records are reported as
  /// absent; their remaining row exists only for referential integrity.
  pub async fn get_user(&self, id: Uuid) -> Result<User, AuthError> {
    let user = self
      .user_repo
      .find_by_id(id)
      .await?
      .ok_or(AuthError::UserNotFound)?;
    if user.anonymized {
      return Err(AuthError::UserNotFound);
    }
    Ok(user)
  }

  /// Applies a partial profile update. Changing marketing consent also
  /// stamps (or clears) the consent timestamp.
  pub async fn update_profile(
    &self,
    id: Uuid,
    request: UpdateProfileRequest,
  ) -> Result<User, AuthError> {
    let mut user = self.get_user(id).await?;
    let now = self.clock.now();

    if let Some(first_name) = request.first_name {
      user.first_name = first_name;
    }
    if let Some(last_name) = request.last_name {
      user.last_name = last_name;
    }
    if let Some(consent) = request.marketing_consent {
      if consent != user.marketing_consent {
        user.set_marketing_consent(consent, now);
        self.audit.emit(
          AuditAction::MarketingConsentUpdated,
          user.id,
          json!({ "marketing_consent": consent }),
        );
      }
    }
    user.updated_at = now;

    let user = self.user_repo.update(user).await?;
    self
      .audit
      .emit(AuditAction::ProfileUpdated, user.id, json!({}));
    Ok(user)
  }

  /// Irreversibly scrubs personal data from the record while keeping the
  /// row. Running it twice is an error, not a no-op.
  pub async fn anonymize_user(&self, id: Uuid) -> Result<(), AuthError> {
    let user = self
      .user_repo
      .find_by_id(id)
      .await?
      .ok_or(AuthError::UserNotFound)?;
    if user.anonymized {
      return Err(AuthError::AlreadyAnonymized);
    }

    let mut user = user;
    user.anonymize(self.clock.now());
    self.user_repo.update(user).await?;

    self
      .audit
      .emit(AuditAction::UserAnonymized, id, json!({}));
    Ok(())
  }

  /// Assembles the GDPR data-portability export for a user
  pub async fn export_user_data(&self, id: Uuid) -> Result<serde_json::Value, AuthError> {
    let user = self.get_user(id).await?;

    let export = json!({
      "personal_data": {
        "id": user.id,
        "email": user.email,
        "first_name": user.first_name,
        "last_name": user.last_name,
      },
      "account": {
        "role": user.role,
        "status": user.status,
        "email_verified": user.email_verified,
        "last_login_at": user.last_login_at,
        "created_at": user.created_at,
      },
      "gdpr": {
        "gdpr_consent": user.gdpr_consent,
        "gdpr_consent_date": user.gdpr_consent_date,
        "marketing_consent": user.marketing_consent,
        "marketing_consent_date": user.marketing_consent_date,
      },
      "metadata": {
        "exported_at": self.clock.now(),
      },
    });

    self
      .audit
      .emit(AuditAction::DataExportRequested, id, json!({}));
    Ok(export)
  }

  /// Soft-deletes the account. The record stays retrievable for retention
  /// purposes but disappears from every lookup.
  pub async fn delete_account(&self, id: Uuid) -> Result<(), AuthError> {
    // Confirm existence first so deleting a missing user reports NotFound
    self.get_user(id).await?;
    self.user_repo.soft_delete(id).await?;
    self
      .audit
      .emit(AuditAction::AccountDeleted, id, json!({}));
    Ok(())
  }

  /// Administrative suspension. A suspended user cannot sign in.
  pub async fn suspend_account(&self, id: Uuid, reason: Option<String>) -> Result<(), AuthError> {
    let mut user = self.get_user(id).await?;
    user.set_status(UserStatus::Suspended, self.clock.now());
    self.user_repo.update(user).await?;
    self.audit.emit(
      AuditAction::AccountSuspended,
      id,
      json!({ "reason": reason }),
    );
    Ok(())
  }

  /// Lifts a suspension
  pub async fn activate_account(&self, id: Uuid) -> Result<(), AuthError> {
    let mut user = self.get_user(id).await?;
    user.set_status(UserStatus::Active, self.clock.now());
    self.user_repo.update(user).await?;
    self
      .audit
      .emit(AuditAction::AccountActivated, id, json!({}));
    Ok(())
  }
}
