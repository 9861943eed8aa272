pub mod services;

pub use services::{UpdateProfileRequest, UserService};
