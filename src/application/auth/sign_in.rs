use std::sync::Arc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::{AuthResponse, AuthService};

/// Command for authenticating a user
#[derive(Debug, Clone)]
pub struct SignInCommand {
  pub email: String,
  pub password: String,
}

/// Use case for authenticating a user by email and password
pub struct SignInUseCase {
  auth_service: Arc<AuthService>,
}

impl SignInUseCase {
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Executes the sign-in workflow
  ///
  /// # Errors
  /// Returns `AuthError::InvalidCredentials` for any credential failure and
  /// `AuthError::AccountLocked` while the lockout window is open
  pub async fn execute(
    &self,
    command: SignInCommand,
    client_ip: Option<String>,
  ) -> Result<AuthResponse, AuthError> {
    self
      .auth_service
      .sign_in(&command.email, &command.password, client_ip)
      .await
  }
}
