pub mod auth;

pub use auth::{AuthMiddleware, AuthenticatedClaims, Capability};
