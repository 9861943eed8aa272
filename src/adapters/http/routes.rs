use actix_web::{HttpResponse, web};
use std::sync::Arc;

use crate::application::auth::{
  RefreshTokenUseCase, SignInUseCase, SignOutUseCase, SignUpUseCase,
};
use crate::application::users::{
  AnonymizeAccountUseCase, DeleteAccountUseCase, ExportDataUseCase, GetProfileUseCase,
  ManageAccountStatusUseCase, UpdateProfileUseCase,
};

use super::handlers::auth::{refresh_handler, signin_handler, signout_handler, signup_handler};
use super::handlers::users::{
  activate_handler, anonymize_handler, delete_account_handler, export_data_handler,
  get_profile_handler, suspend_handler, update_profile_handler,
};

/// Configure authentication routes under /api/v1/auth
///
/// - POST /signup - Register a new account and open the first session
/// - POST /signin - Authenticate with email and password
/// - POST /refresh - Exchange a refresh token for a new pair
/// - DELETE /signout - Invalidate the current session
pub fn configure_auth_routes(
  cfg: &mut web::ServiceConfig,
  sign_up_use_case: Arc<SignUpUseCase>,
  sign_in_use_case: Arc<SignInUseCase>,
  refresh_use_case: Arc<RefreshTokenUseCase>,
  sign_out_use_case: Arc<SignOutUseCase>,
) {
  cfg
    .app_data(web::Data::new(sign_up_use_case))
    .app_data(web::Data::new(sign_in_use_case))
    .app_data(web::Data::new(refresh_use_case))
    .app_data(web::Data::new(sign_out_use_case))
    .route("/signup", web::post().to(signup_handler))
    .route("/signin", web::post().to(signin_handler))
    .route("/refresh", web::post().to(refresh_handler))
    .route("/signout", web::delete().to(signout_handler));
}

/// Configure user and GDPR routes under /api/v1/users
///
/// - GET /me - Current user's profile
/// - PATCH /me - Partial profile update
/// - DELETE /me - Soft account deletion
/// - GET /me/export - GDPR data-portability export
/// - DELETE /me/anonymize - GDPR right-to-erasure
/// - POST /{id}/suspend - Administrative suspension (admin)
/// - POST /{id}/activate - Lift a suspension (admin)
pub fn configure_user_routes(
  cfg: &mut web::ServiceConfig,
  get_profile_use_case: Arc<GetProfileUseCase>,
  update_profile_use_case: Arc<UpdateProfileUseCase>,
  delete_account_use_case: Arc<DeleteAccountUseCase>,
  export_data_use_case: Arc<ExportDataUseCase>,
  anonymize_use_case: Arc<AnonymizeAccountUseCase>,
  manage_status_use_case: Arc<ManageAccountStatusUseCase>,
) {
  cfg
    .app_data(web::Data::new(get_profile_use_case))
    .app_data(web::Data::new(update_profile_use_case))
    .app_data(web::Data::new(delete_account_use_case))
    .app_data(web::Data::new(export_data_use_case))
    .app_data(web::Data::new(anonymize_use_case))
    .app_data(web::Data::new(manage_status_use_case))
    .route("/me", web::get().to(get_profile_handler))
    .route("/me", web::patch().to(update_profile_handler))
    .route("/me", web::delete().to(delete_account_handler))
    .route("/me/export", web::get().to(export_data_handler))
    .route("/me/anonymize", web::delete().to(anonymize_handler))
    .route("/{id}/suspend", web::post().to(suspend_handler))
    .route("/{id}/activate", web::post().to(activate_handler));
}

/// Liveness endpoint
pub async fn health_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}
