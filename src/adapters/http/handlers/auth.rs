use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use validator::Validate;

use crate::adapters::http::{
  dtos::{RefreshRequestDto, SessionResponseDto, SignInRequestDto, SignUpRequestDto, SuccessResponse},
  errors::ApiError,
  middleware::AuthenticatedClaims,
};
use crate::application::auth::{
  RefreshTokenUseCase, SignInCommand, SignInUseCase, SignOutUseCase, SignUpCommand, SignUpUseCase,
};

/// Extract the client IP for the sign-in audit trail
fn extract_client_ip(req: &HttpRequest) -> Option<String> {
  req
    .connection_info()
    .realip_remote_addr()
    .map(|addr| addr.split(':').next().unwrap_or(addr).to_string())
}

/// Handler for user registration
///
/// POST /api/v1/auth/signup
/// Body: SignUpRequestDto (JSON)
/// Response: SessionResponseDto (JSON) with status 201
pub async fn signup_handler(
  request: web::Json<SignUpRequestDto>,
  use_case: web::Data<Arc<SignUpUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let command = SignUpCommand {
    email: request.email.clone(),
    password: request.password.clone(),
    first_name: request.first_name.clone(),
    last_name: request.last_name.clone(),
    gdpr_consent: request.gdpr_consent,
    marketing_consent: request.marketing_consent,
  };

  let response = use_case.execute(command).await?;

  Ok(HttpResponse::Created().json(SessionResponseDto::from(response)))
}

/// Handler for user sign-in
///
/// POST /api/v1/auth/signin
/// Body: SignInRequestDto (JSON)
/// Response: SessionResponseDto (JSON) with status 200
pub async fn signin_handler(
  request: web::Json<SignInRequestDto>,
  use_case: web::Data<Arc<SignInUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let client_ip = extract_client_ip(&http_req);
  let command = SignInCommand {
    email: request.email.clone(),
    password: request.password.clone(),
  };

  let response = use_case.execute(command, client_ip).await?;

  Ok(HttpResponse::Ok().json(SessionResponseDto::from(response)))
}

/// Handler for refresh-token exchange
///
/// POST /api/v1/auth/refresh
/// Body: RefreshRequestDto (JSON)
/// Response: SessionResponseDto (JSON) with status 200
pub async fn refresh_handler(
  request: web::Json<RefreshRequestDto>,
  use_case: web::Data<Arc<RefreshTokenUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let response = use_case.execute(&request.refresh_token).await?;

  Ok(HttpResponse::Ok().json(SessionResponseDto::from(response)))
}

/// Handler for sign-out
///
/// DELETE /api/v1/auth/signout
/// Headers: Authorization: Bearer <access token>
/// Response: SuccessResponse (JSON) with status 200
pub async fn signout_handler(
  use_case: web::Data<Arc<SignOutUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let claims = http_req.auth_claims();

  use_case.execute(claims.sub).await?;

  Ok(HttpResponse::Ok().json(SuccessResponse {
    message: "Successfully signed out".to_string(),
  }))
}
