use async_trait::async_trait;

use crate::errors::DirectoryError;
use crate::types::internal::identity::{CreationOutcome, Identity, SignInOutcome};

/// Capabilities the coordinators need from a credential directory
///
/// The directory owns accounts, password hashes and lockout state. Refusals
/// (wrong password, locked account, duplicate username, invalid fields) are
/// reported through the outcome enums; `Err` is reserved for the directory
/// itself failing.
#[async_trait]
pub trait CredentialDirectory: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, DirectoryError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, DirectoryError>;

    /// Create an account; the directory hashes `password` itself
    async fn create_account(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<CreationOutcome, DirectoryError>;

    /// Verify a password for an already resolved identity
    ///
    /// `allow_lockout` makes a failed attempt count towards lockout.
    /// `is_persistent` asks for a long-lived session where the directory
    /// supports one.
    async fn password_sign_in(
        &self,
        identity: &Identity,
        password: &str,
        allow_lockout: bool,
        is_persistent: bool,
    ) -> Result<SignInOutcome, DirectoryError>;
}
