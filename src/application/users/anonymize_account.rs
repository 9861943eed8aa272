use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::users::services::UserService;

/// Use case for the GDPR right-to-erasure request
pub struct AnonymizeAccountUseCase {
  user_service: Arc<UserService>,
}

impl AnonymizeAccountUseCase {
  pub fn new(user_service: Arc<UserService>) -> Self {
    Self { user_service }
  }

  pub async fn execute(&self, user_id: Uuid) -> Result<(), AuthError> {
    self.user_service.anonymize_user(user_id).await
  }
}
