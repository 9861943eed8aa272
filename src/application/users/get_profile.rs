use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::PublicUser;
use crate::domain::users::services::UserService;

/// Use case for fetching the authenticated user's profile
pub struct GetProfileUseCase {
  user_service: Arc<UserService>,
}

impl GetProfileUseCase {
  pub fn new(user_service: Arc<UserService>) -> Self {
    Self { user_service }
  }

  pub async fn execute(&self, user_id: Uuid) -> Result<PublicUser, AuthError> {
    let user = self.user_service.get_user(user_id).await?;
    Ok(PublicUser::from(&user))
  }
}
