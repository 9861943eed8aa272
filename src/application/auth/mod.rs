//! Authentication use cases
//!
//! Thin application-level workflows over the domain `AuthService`, one per
//! transport operation.

mod refresh_token;
mod sign_in;
mod sign_out;
mod sign_up;

pub use refresh_token::RefreshTokenUseCase;
pub use sign_in::{SignInCommand, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use sign_up::{SignUpCommand, SignUpUseCase};
