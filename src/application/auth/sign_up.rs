use std::sync::Arc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::{AuthResponse, AuthService, SignUpRequest};

/// Command for registering a new user
#[derive(Debug, Clone)]
pub struct SignUpCommand {
  pub email: String,
  pub password: String,
  pub first_name: String,
  pub last_name: String,
  pub gdpr_consent: bool,
  pub marketing_consent: bool,
}

/// Use case for registering a new user and opening their first session
pub struct SignUpUseCase {
  auth_service: Arc<AuthService>,
}

impl SignUpUseCase {
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Executes the sign-up workflow
  ///
  /// # Errors
  /// Returns `AuthError` when consent is missing, the email is taken or
  /// the credentials fail validation
  pub async fn execute(&self, command: SignUpCommand) -> Result<AuthResponse, AuthError> {
    self
      .auth_service
      .sign_up(SignUpRequest {
        email: command.email,
        password: command.password,
        first_name: command.first_name,
        last_name: command.last_name,
        gdpr_consent: command.gdpr_consent,
        marketing_consent: command.marketing_consent,
      })
      .await
  }
}
