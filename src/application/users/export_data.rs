use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::users::services::UserService;

/// Use case for the GDPR data-portability export
pub struct ExportDataUseCase {
  user_service: Arc<UserService>,
}

impl ExportDataUseCase {
  pub fn new(user_service: Arc<UserService>) -> Self {
    Self { user_service }
  }

  pub async fn execute(&self, user_id: Uuid) -> Result<serde_json::Value, AuthError> {
    self.user_service.export_user_data(user_id).await
  }
}
