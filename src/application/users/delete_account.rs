use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::users::services::UserService;

/// Use case for soft-deleting the authenticated user's account
pub struct DeleteAccountUseCase {
  user_service: Arc<UserService>,
}

impl DeleteAccountUseCase {
  pub fn new(user_service: Arc<UserService>) -> Self {
    Self { user_service }
  }

  pub async fn execute(&self, user_id: Uuid) -> Result<(), AuthError> {
    self.user_service.delete_account(user_id).await
  }
}
