// Stores layer - Credential directory and its SeaORM implementation
pub mod account_store;
pub mod account_validator;
pub mod credential_directory;

pub use account_store::AccountStore;
pub use account_validator::{AccountValidationError, AccountValidator};
pub use credential_directory::CredentialDirectory;
