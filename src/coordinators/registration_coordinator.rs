use std::sync::Arc;
use std::time::Duration;

use crate::app_data::AppData;
use crate::coordinators::{bounded, password_sign_in};
use crate::errors::InternalError;
use crate::providers::outcome_mapper::{self, messages, CreationDisposition, SignInDisposition};
use crate::providers::TokenProvider;
use crate::stores::CredentialDirectory;
use crate::types::internal::auth_result::AuthResult;
use crate::types::internal::requests::RegisterRequest;

/// Drives the registration workflow
///
/// A new account is signed in straight away so the caller gets a token from
/// the same request.
pub struct RegistrationCoordinator {
    directory: Arc<dyn CredentialDirectory>,
    token_provider: Arc<TokenProvider>,
    call_timeout: Duration,
}

impl RegistrationCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            directory: Arc::clone(&app_data.directory),
            token_provider: Arc::clone(&app_data.token_provider),
            call_timeout: app_data.settings.directory_timeout,
        }
    }

    /// Register a new account and sign it in
    ///
    /// Never fails: unexpected errors are logged and returned as a failed
    /// result with the error chain in `errors`.
    pub async fn register(&self, request: RegisterRequest) -> AuthResult {
        match self.try_register(&request).await {
            Ok(result) => result,
            Err(err) => {
                tracing::error!(error = %err, "An error occurred while registering");
                AuthResult::from_error(&err)
            }
        }
    }

    async fn try_register(&self, request: &RegisterRequest) -> Result<AuthResult, InternalError> {
        let existing = bounded(
            self.call_timeout,
            "find_by_username",
            self.directory.find_by_username(&request.username),
        )
        .await?;
        if existing.is_some() {
            tracing::warn!("Registration refused: username already taken");
            return Ok(outcome_mapper::username_taken());
        }

        let outcome = bounded(
            self.call_timeout,
            "create_account",
            self.directory
                .create_account(&request.username, &request.email, &request.password),
        )
        .await?;

        let identity = match outcome_mapper::map_creation(outcome) {
            CreationDisposition::Created(identity) => identity,
            CreationDisposition::Rejected(result) => {
                tracing::warn!(reason = result.message(), "Registration refused");
                return Ok(result);
            }
        };
        tracing::info!(account_id = %identity.id, "Account created");

        let outcome = password_sign_in(
            self.directory.as_ref(),
            self.call_timeout,
            &identity,
            &request.password,
        )
        .await?;

        match outcome_mapper::map_sign_in(outcome) {
            SignInDisposition::Authenticated(identity) => {
                let token = self.token_provider.issue(&identity)?;
                tracing::info!(account_id = %identity.id, "User registered and signed in");
                Ok(AuthResult::authenticated(messages::REGISTERED, identity, token))
            }
            SignInDisposition::Rejected(result) => {
                tracing::warn!(
                    account_id = %identity.id,
                    reason = result.message(),
                    "Account created but sign-in failed"
                );
                Ok(AuthResult::rejected(
                    format!("{}: {}", messages::SIGN_IN_AFTER_REGISTRATION_FAILED, result.message()),
                    Some(identity),
                ))
            }
        }
    }
}
