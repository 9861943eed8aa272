use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;

/// Use case for terminating the current session
pub struct SignOutUseCase {
  auth_service: Arc<AuthService>,
}

impl SignOutUseCase {
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  pub async fn execute(&self, user_id: Uuid) -> Result<(), AuthError> {
    self.auth_service.sign_out(user_id).await
  }
}
