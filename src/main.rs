use actix_web::{App, HttpServer, middleware::Logger, web};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use warden::{
  adapters::http::{
    middleware::AuthMiddleware,
    routes::{configure_auth_routes, configure_user_routes, health_handler},
  },
  application::auth::{RefreshTokenUseCase, SignInUseCase, SignOutUseCase, SignUpUseCase},
  application::users::{
    AnonymizeAccountUseCase, DeleteAccountUseCase, ExportDataUseCase, GetProfileUseCase,
    ManageAccountStatusUseCase, UpdateProfileUseCase,
  },
  domain::auth::ports::{Clock, TokenIssuer},
  domain::auth::services::{AuthService, AuthServiceConfig},
  domain::users::services::UserService,
  infrastructure::{
    audit::TracingAuditSink,
    clock::SystemClock,
    config::Config,
    persistence::postgres::PostgresUserRepository,
    security::{Argon2Hasher, JwtTokenIssuer},
  },
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warden=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting warden");

  let config = Config::load().expect("Failed to load configuration");
  tracing::info!("Configuration loaded");

  let db_pool = tokio::time::timeout(
    Duration::from_secs(config.database.connect_timeout_seconds),
    PgPoolOptions::new()
      .max_connections(config.database.max_connections)
      .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds))
      .connect(&config.database.url),
  )
  .await
  .map_err(|_| {
    tracing::error!(
      "Database connection timed out after {} seconds. Is PostgreSQL running?",
      config.database.connect_timeout_seconds
    );
    std::io::Error::new(std::io::ErrorKind::TimedOut, "Database connection timed out")
  })?
  .map_err(|e| {
    tracing::error!("Failed to connect to database: {}", e);
    std::io::Error::other(format!("Database error: {}", e))
  })?;

  tracing::info!("Database connection pool created");

  sqlx::migrate!("./migrations")
    .run(&db_pool)
    .await
    .expect("Failed to run database migrations");
  tracing::info!("Database migrations completed");

  // Wire ports to their implementations
  let user_repo = Arc::new(PostgresUserRepository::new(db_pool.clone()));
  let password_hasher = Arc::new(Argon2Hasher::new().expect("Failed to create password hasher"));
  let clock: Arc<dyn Clock> = Arc::new(SystemClock);
  let token_issuer: Arc<dyn TokenIssuer> =
    Arc::new(JwtTokenIssuer::new(&config.jwt, clock.clone()));
  let audit = Arc::new(TracingAuditSink);

  let auth_service = Arc::new(AuthService::new(
    user_repo.clone(),
    password_hasher,
    token_issuer.clone(),
    clock.clone(),
    audit.clone(),
    AuthServiceConfig {
      max_failed_attempts: config.security.max_failed_attempts,
      lockout_minutes: config.security.lockout_minutes,
    },
  ));

  let user_service = Arc::new(UserService::new(
    user_repo.clone(),
    clock.clone(),
    audit.clone(),
  ));

  let sign_up_use_case = Arc::new(SignUpUseCase::new(auth_service.clone()));
  let sign_in_use_case = Arc::new(SignInUseCase::new(auth_service.clone()));
  let refresh_use_case = Arc::new(RefreshTokenUseCase::new(auth_service.clone()));
  let sign_out_use_case = Arc::new(SignOutUseCase::new(auth_service.clone()));

  let get_profile_use_case = Arc::new(GetProfileUseCase::new(user_service.clone()));
  let update_profile_use_case = Arc::new(UpdateProfileUseCase::new(user_service.clone()));
  let delete_account_use_case = Arc::new(DeleteAccountUseCase::new(user_service.clone()));
  let export_data_use_case = Arc::new(ExportDataUseCase::new(user_service.clone()));
  let anonymize_use_case = Arc::new(AnonymizeAccountUseCase::new(user_service.clone()));
  let manage_status_use_case = Arc::new(ManageAccountStatusUseCase::new(user_service.clone()));

  let server_host = config.server.host.clone();
  let server_port = config.server.port;

  tracing::info!("Starting HTTP server on {}:{}", server_host, server_port);

  HttpServer::new(move || {
    App::new()
      .wrap(Logger::default())
      // One middleware gates everything; per-route requirements live in
      // its capability table
      .wrap(AuthMiddleware::new(token_issuer.clone()))
      .service(web::scope("/api/v1/auth").configure(|cfg| {
        configure_auth_routes(
          cfg,
          sign_up_use_case.clone(),
          sign_in_use_case.clone(),
          refresh_use_case.clone(),
          sign_out_use_case.clone(),
        )
      }))
      .service(web::scope("/api/v1/users").configure(|cfg| {
        configure_user_routes(
          cfg,
          get_profile_use_case.clone(),
          update_profile_use_case.clone(),
          delete_account_use_case.clone(),
          export_data_use_case.clone(),
          anonymize_use_case.clone(),
          manage_status_use_case.clone(),
        )
      }))
      .route("/health", web::get().to(health_handler))
  })
  .bind((server_host.as_str(), server_port))?
  .run()
  .await
}
