use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::PublicUser;
use crate::domain::users::services::{UpdateProfileRequest, UserService};

/// Command for a partial profile update
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileCommand {
  pub first_name: Option<String>,
  pub last_name: Option<String>,
  pub marketing_consent: Option<bool>,
}

/// Use case for updating the authenticated user's profile
pub struct UpdateProfileUseCase {
  user_service: Arc<UserService>,
}

impl UpdateProfileUseCase {
  pub fn new(user_service: Arc<UserService>) -> Self {
    Self { user_service }
  }

  pub async fn execute(
    &self,
    user_id: Uuid,
    command: UpdateProfileCommand,
  ) -> Result<PublicUser, AuthError> {
    let user = self
      .user_service
      .update_profile(
        user_id,
        UpdateProfileRequest {
          first_name: command.first_name,
          last_name: command.last_name,
          marketing_consent: command.marketing_consent,
        },
      )
      .await?;
    Ok(PublicUser::from(&user))
  }
}
