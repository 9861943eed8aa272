use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::users::services::UserService;

/// Use case for administrative suspension and reactivation
pub struct ManageAccountStatusUseCase {
  user_service: Arc<UserService>,
}

impl ManageAccountStatusUseCase {
  pub fn new(user_service: Arc<UserService>) -> Self {
    Self { user_service }
  }

  pub async fn suspend(&self, user_id: Uuid, reason: Option<String>) -> Result<(), AuthError> {
    self.user_service.suspend_account(user_id, reason).await
  }

  pub async fn activate(&self, user_id: Uuid) -> Result<(), AuthError> {
    self.user_service.activate_account(user_id).await
  }
}
