//! Account-lifecycle use cases
//!
//! Profile management plus the GDPR surface: export, erasure, deletion and
//! administrative status changes.

mod anonymize_account;
mod delete_account;
mod export_data;
mod get_profile;
mod manage_status;
mod update_profile;

pub use anonymize_account::AnonymizeAccountUseCase;
pub use delete_account::DeleteAccountUseCase;
pub use export_data::ExportDataUseCase;
pub use get_profile::GetProfileUseCase;
pub use manage_status::ManageAccountStatusUseCase;
pub use update_profile::{UpdateProfileCommand, UpdateProfileUseCase};
