use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::adapters::http::{
  dtos::{SuccessResponse, SuspendRequestDto, UpdateProfileRequestDto, UserDto},
  errors::ApiError,
  middleware::AuthenticatedClaims,
};
use crate::application::users::{
  AnonymizeAccountUseCase, DeleteAccountUseCase, ExportDataUseCase, GetProfileUseCase,
  ManageAccountStatusUseCase, UpdateProfileCommand, UpdateProfileUseCase,
};

/// Handler for the authenticated user's profile
///
/// GET /api/v1/users/me
/// Response: UserDto (JSON) with status 200
pub async fn get_profile_handler(
  use_case: web::Data<Arc<GetProfileUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let claims = http_req.auth_claims();

  let profile = use_case.execute(claims.sub).await?;

  Ok(HttpResponse::Ok().json(UserDto::from(profile)))
}

/// Handler for a partial profile update
///
/// PATCH /api/v1/users/me
/// Body: UpdateProfileRequestDto (JSON)
/// Response: UserDto (JSON) with status 200
pub async fn update_profile_handler(
  request: web::Json<UpdateProfileRequestDto>,
  use_case: web::Data<Arc<UpdateProfileUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let claims = http_req.auth_claims();

  let command = UpdateProfileCommand {
    first_name: request.first_name.clone(),
    last_name: request.last_name.clone(),
    marketing_consent: request.marketing_consent,
  };

  let profile = use_case.execute(claims.sub, command).await?;

  Ok(HttpResponse::Ok().json(UserDto::from(profile)))
}

/// Handler for soft account deletion
///
/// DELETE /api/v1/users/me
/// Response: SuccessResponse (JSON) with status 200
pub async fn delete_account_handler(
  use_case: web::Data<Arc<DeleteAccountUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let claims = http_req.auth_claims();

  use_case.execute(claims.sub).await?;

  Ok(HttpResponse::Ok().json(SuccessResponse {
    message: "Account deleted".to_string(),
  }))
}

/// Handler for the GDPR data-portability export
///
/// GET /api/v1/users/me/export
/// Response: full export document (JSON) with status 200
pub async fn export_data_handler(
  use_case: web::Data<Arc<ExportDataUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let claims = http_req.auth_claims();

  let export = use_case.execute(claims.sub).await?;

  Ok(HttpResponse::Ok().json(export))
}

/// Handler for the GDPR right-to-erasure request
///
/// DELETE /api/v1/users/me/anonymize
/// Response: SuccessResponse (JSON) with status 200
pub async fn anonymize_handler(
  use_case: web::Data<Arc<AnonymizeAccountUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let claims = http_req.auth_claims();

  use_case.execute(claims.sub).await?;

  Ok(HttpResponse::Ok().json(SuccessResponse {
    message: "Account anonymized".to_string(),
  }))
}

/// Handler for administrative suspension
///
/// POST /api/v1/users/{id}/suspend
/// Body: SuspendRequestDto (JSON, optional reason)
/// Response: SuccessResponse (JSON) with status 200
pub async fn suspend_handler(
  path: web::Path<Uuid>,
  request: web::Json<SuspendRequestDto>,
  use_case: web::Data<Arc<ManageAccountStatusUseCase>>,
) -> Result<HttpResponse, ApiError> {
  use_case
    .suspend(path.into_inner(), request.reason.clone())
    .await?;

  Ok(HttpResponse::Ok().json(SuccessResponse {
    message: "Account suspended".to_string(),
  }))
}

/// Handler for lifting a suspension
///
/// POST /api/v1/users/{id}/activate
/// Response: SuccessResponse (JSON) with status 200
pub async fn activate_handler(
  path: web::Path<Uuid>,
  use_case: web::Data<Arc<ManageAccountStatusUseCase>>,
) -> Result<HttpResponse, ApiError> {
  use_case.activate(path.into_inner()).await?;

  Ok(HttpResponse::Ok().json(SuccessResponse {
    message: "Account activated".to_string(),
  }))
}
