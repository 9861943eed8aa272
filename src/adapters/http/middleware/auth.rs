use actix_web::{
  Error, HttpMessage,
  body::EitherBody,
  dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
  error::ResponseError,
  http::Method,
};
use futures_util::future::LocalBoxFuture;
use std::{
  future::{Ready, ready},
  rc::Rc,
  sync::Arc,
};

use crate::{
  adapters::http::errors::{ApiError, AuthErrorKind},
  domain::auth::entities::UserRole,
  domain::auth::ports::{TokenClaims, TokenIssuer, TokenKind},
};

/// Capability a route demands from the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
  /// No token required
  Public,
  /// Any authenticated user
  User,
  /// Admin role or above
  Admin,
}

/// The complete route-to-capability table. Every route the server exposes
/// is listed here; requests that match nothing are treated as `User` so an
/// unlisted route can never be accidentally public.
const OPERATIONS: &[(&Method, &str, Capability)] = &[
  (&Method::POST, "/api/v1/auth/signup", Capability::Public),
  (&Method::POST, "/api/v1/auth/signin", Capability::Public),
  (&Method::POST, "/api/v1/auth/refresh", Capability::Public),
  (&Method::DELETE, "/api/v1/auth/signout", Capability::User),
  (&Method::GET, "/api/v1/users/me", Capability::User),
  (&Method::PATCH, "/api/v1/users/me", Capability::User),
  (&Method::DELETE, "/api/v1/users/me", Capability::User),
  (&Method::GET, "/api/v1/users/me/export", Capability::User),
  (&Method::DELETE, "/api/v1/users/me/anonymize", Capability::User),
  (&Method::POST, "/api/v1/users/{id}/suspend", Capability::Admin),
  (&Method::POST, "/api/v1/users/{id}/activate", Capability::Admin),
  (&Method::GET, "/health", Capability::Public),
];

/// Segment-wise pattern match; `{...}` segments match any single segment
fn path_matches(pattern: &str, path: &str) -> bool {
  let mut pattern_segments = pattern.split('/');
  let mut path_segments = path.split('/');

  loop {
    match (pattern_segments.next(), path_segments.next()) {
      (None, None) => return true,
      (Some(p), Some(s)) => {
        if !p.starts_with('{') && p != s {
          return false;
        }
      }
      _ => return false,
    }
  }
}

/// Looks up the capability a request needs
pub fn required_capability(method: &Method, path: &str) -> Capability {
  let path = path.trim_end_matches('/');
  let path = if path.is_empty() { "/" } else { path };
  for (m, pattern, capability) in OPERATIONS {
    if *m == method && path_matches(pattern, path) {
      return *capability;
    }
  }
  Capability::User
}

/// Authentication middleware applied once for the whole application.
///
/// Public routes pass untouched. For everything else the bearer token must
/// verify as an access token; its claims land in request extensions for the
/// handlers. Admin routes additionally require the admin role or above.
pub struct AuthMiddleware {
  token_issuer: Arc<dyn TokenIssuer>,
}

impl AuthMiddleware {
  pub fn new(token_issuer: Arc<dyn TokenIssuer>) -> Self {
    Self { token_issuer }
  }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Transform = AuthMiddlewareService<S>;
  type InitError = ();
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(AuthMiddlewareService {
      service: Rc::new(service),
      token_issuer: self.token_issuer.clone(),
    }))
  }
}

pub struct AuthMiddlewareService<S> {
  service: Rc<S>,
  token_issuer: Arc<dyn TokenIssuer>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  forward_ready!(service);

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let service = Rc::clone(&self.service);
    let token_issuer = self.token_issuer.clone();

    Box::pin(async move {
      let capability = required_capability(req.method(), req.path());

      if capability == Capability::Public {
        let res = service.call(req).await?;
        return Ok(res.map_into_left_body());
      }

      let token = match extract_bearer_token(&req) {
        Ok(token) => token,
        Err(e) => {
          let (request, _) = req.into_parts();
          let response = e.error_response().map_into_right_body();
          return Ok(ServiceResponse::new(request, response));
        }
      };

      let claims = match token_issuer.verify(&token, TokenKind::Access) {
        Ok(claims) => claims,
        Err(_) => {
          let (request, _) = req.into_parts();
          let response = ApiError::Auth(AuthErrorKind::InvalidToken)
            .error_response()
            .map_into_right_body();
          return Ok(ServiceResponse::new(request, response));
        }
      };

      if capability == Capability::Admin && claims.role < UserRole::Admin {
        let (request, _) = req.into_parts();
        let response = ApiError::Auth(AuthErrorKind::Forbidden)
          .error_response()
          .map_into_right_body();
        return Ok(ServiceResponse::new(request, response));
      }

      req.extensions_mut().insert(claims);

      let res = service.call(req).await?;
      Ok(res.map_into_left_body())
    })
  }
}

fn extract_bearer_token(req: &ServiceRequest) -> Result<String, ApiError> {
  req
    .headers()
    .get("Authorization")
    .and_then(|h| h.to_str().ok())
    .and_then(|s| s.strip_prefix("Bearer "))
    .map(|s| s.to_string())
    .ok_or(ApiError::Auth(AuthErrorKind::InvalidToken))
}

/// Extension trait for handlers behind the middleware
pub trait AuthenticatedClaims {
  /// Claims of the verified access token
  ///
  /// # Panics
  /// Panics when called on a route the middleware did not guard.
  fn auth_claims(&self) -> TokenClaims;
}

impl AuthenticatedClaims for actix_web::HttpRequest {
  fn auth_claims(&self) -> TokenClaims {
    self
      .extensions()
      .get::<TokenClaims>()
      .cloned()
      .expect("Token claims not found in request extensions. Is AuthMiddleware applied?")
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::test::TestRequest;

  #[test]
  fn test_signup_and_health_are_public() {
    assert_eq!(
      required_capability(&Method::POST, "/api/v1/auth/signup"),
      Capability::Public
    );
    assert_eq!(
      required_capability(&Method::GET, "/health"),
      Capability::Public
    );
  }

  #[test]
  fn test_signout_requires_a_user() {
    assert_eq!(
      required_capability(&Method::DELETE, "/api/v1/auth/signout"),
      Capability::User
    );
  }

  #[test]
  fn test_admin_routes_match_with_any_id() {
    assert_eq!(
      required_capability(
        &Method::POST,
        "/api/v1/users/08aa2d30-1111-2222-3333-444455556666/suspend"
      ),
      Capability::Admin
    );
  }

  #[test]
  fn test_unknown_routes_are_never_public() {
    assert_eq!(
      required_capability(&Method::GET, "/api/v1/internal/debug"),
      Capability::User
    );
  }

  #[test]
  fn test_method_participates_in_the_lookup() {
    // GET on the signup path is not the signup operation
    assert_eq!(
      required_capability(&Method::GET, "/api/v1/auth/signup"),
      Capability::User
    );
  }

  #[test]
  fn test_trailing_slash_is_ignored() {
    assert_eq!(
      required_capability(&Method::GET, "/api/v1/users/me/"),
      Capability::User
    );
  }

  #[test]
  fn test_extract_bearer_token() {
    let req = TestRequest::default()
      .insert_header(("Authorization", "Bearer test_token_123"))
      .to_srv_request();
    assert_eq!(extract_bearer_token(&req).unwrap(), "test_token_123");

    let req = TestRequest::default().to_srv_request();
    assert!(extract_bearer_token(&req).is_err());

    let req = TestRequest::default()
      .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
      .to_srv_request();
    assert!(extract_bearer_token(&req).is_err());
  }
}
