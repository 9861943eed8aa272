pub mod entities;
pub mod errors;
pub mod lockout;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{NewUser, User, UserRole, UserStatus};
pub use errors::{AuthError, HashError, RepositoryError, TokenError};
pub use lockout::LockoutPolicy;
pub use ports::{
  AuditAction, AuditSink, Clock, PasswordHasher, TokenClaims, TokenIssuer, TokenKind,
  UserRepository,
};
pub use services::{AuthResponse, AuthService, AuthServiceConfig, PublicUser, SignUpRequest};
pub use value_objects::{Email, Password, PasswordHash};
