use std::sync::Arc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::{AuthResponse, AuthService};

/// Use case for exchanging a refresh token for a new token pair
pub struct RefreshTokenUseCase {
  auth_service: Arc<AuthService>,
}

impl RefreshTokenUseCase {
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Executes the refresh-rotation workflow. The presented token is spent
  /// whether or not the exchange succeeds past signature verification.
  pub async fn execute(&self, refresh_token: &str) -> Result<AuthResponse, AuthError> {
    self.auth_service.refresh(refresh_token).await
  }
}
