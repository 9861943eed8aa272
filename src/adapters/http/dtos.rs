use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::auth::entities::UserRole;
use crate::domain::auth::services::{AuthResponse, PublicUser};

/// Request for user registration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignUpRequestDto {
  #[validate(email(message = "Invalid email format"))]
  pub email: String,

  #[validate(length(
    min = 8,
    max = 128,
    message = "Password must be between 8 and 128 characters"
  ))]
  pub password: String,

  #[validate(length(min = 1, max = 100, message = "First name is required"))]
  pub first_name: String,

  #[validate(length(min = 1, max = 100, message = "Last name is required"))]
  pub last_name: String,

  pub gdpr_consent: bool,

  #[serde(default)]
  pub marketing_consent: bool,
}

/// Request for user sign-in
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignInRequestDto {
  #[validate(email(message = "Invalid email format"))]
  pub email: String,

  #[validate(length(min = 1, message = "Password is required"))]
  pub password: String,
}

/// Request for refresh-token exchange
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RefreshRequestDto {
  #[validate(length(min = 1, message = "Refresh token is required"))]
  pub refresh_token: String,
}

/// Request for a partial profile update
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProfileRequestDto {
  #[validate(length(min = 1, max = 100, message = "First name must not be empty"))]
  pub first_name: Option<String>,

  #[validate(length(min = 1, max = 100, message = "Last name must not be empty"))]
  pub last_name: Option<String>,

  pub marketing_consent: Option<bool>,
}

/// Request for administrative account suspension
#[derive(Debug, Clone, Deserialize)]
pub struct SuspendRequestDto {
  pub reason: Option<String>,
}

/// User as exposed over the API
#[derive(Debug, Clone, Serialize)]
pub struct UserDto {
  pub id: Uuid,
  pub email: String,
  pub first_name: String,
  pub last_name: String,
  pub role: UserRole,
}

impl From<PublicUser> for UserDto {
  fn from(user: PublicUser) -> Self {
    Self {
      id: user.id,
      email: user.email,
      first_name: user.first_name,
      last_name: user.last_name,
      role: user.role,
    }
  }
}

/// Token pair returned by signup, signin and refresh
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponseDto {
  pub access_token: String,
  pub refresh_token: String,
  pub token_type: String,
  /// Access token lifetime in seconds
  pub expires_in: u64,
  pub user: UserDto,
}

impl From<AuthResponse> for SessionResponseDto {
  fn from(response: AuthResponse) -> Self {
    Self {
      access_token: response.access_token,
      refresh_token: response.refresh_token,
      token_type: response.token_type,
      expires_in: response.expires_in,
      user: response.user.into(),
    }
  }
}

/// Standard success response for operations without data
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
  pub message: String,
}

/// Standard error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
  pub error: String,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub details: Option<serde_json::Value>,
}
