use std::sync::Arc;
use std::time::Duration;

use crate::app_data::AppData;
use crate::coordinators::{bounded, password_sign_in};
use crate::errors::InternalError;
use crate::providers::outcome_mapper::{self, messages, SignInDisposition};
use crate::providers::TokenProvider;
use crate::stores::CredentialDirectory;
use crate::types::internal::auth_result::AuthResult;
use crate::types::internal::identity::Identity;
use crate::types::internal::requests::LoginRequest;

/// Drives the login workflow
///
/// 1. Resolve the identifier as a username, then as an email
/// 2. Delegate password verification to the directory
/// 3. Map the outcome; issue a token only on success
pub struct LoginCoordinator {
    directory: Arc<dyn CredentialDirectory>,
    token_provider: Arc<TokenProvider>,
    call_timeout: Duration,
}

impl LoginCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            directory: Arc::clone(&app_data.directory),
            token_provider: Arc::clone(&app_data.token_provider),
            call_timeout: app_data.settings.directory_timeout,
        }
    }

    /// Authenticate a login request
    ///
    /// Never fails: unexpected errors are logged and returned as a failed
    /// result with the error chain in `errors`.
    pub async fn authenticate(&self, request: LoginRequest) -> AuthResult {
        match self.try_authenticate(&request).await {
            Ok(result) => result,
            Err(err) => {
                tracing::error!(error = %err, "An error occurred while authenticating");
                AuthResult::from_error(&err)
            }
        }
    }

    async fn try_authenticate(&self, request: &LoginRequest) -> Result<AuthResult, InternalError> {
        let Some(identity) = self.resolve_identity(&request.identifier).await? else {
            tracing::warn!("Login failed: account not found");
            return Ok(outcome_mapper::account_not_found());
        };

        let outcome = password_sign_in(
            self.directory.as_ref(),
            self.call_timeout,
            &identity,
            &request.password,
        )
        .await?;
        let label = outcome.label();

        match outcome_mapper::map_sign_in(outcome) {
            SignInDisposition::Authenticated(identity) => {
                let token = self.token_provider.issue(&identity)?;
                tracing::info!(account_id = %identity.id, "User logged in");
                Ok(AuthResult::authenticated(messages::AUTHENTICATED, identity, token))
            }
            SignInDisposition::Rejected(result) => {
                tracing::warn!(account_id = %identity.id, outcome = label, "User failed to log in");
                Ok(result)
            }
        }
    }

    async fn resolve_identity(&self, identifier: &str) -> Result<Option<Identity>, InternalError> {
        let by_username = bounded(
            self.call_timeout,
            "find_by_username",
            self.directory.find_by_username(identifier),
        )
        .await?;
        if by_username.is_some() {
            return Ok(by_username);
        }

        bounded(
            self.call_timeout,
            "find_by_email",
            self.directory.find_by_email(identifier),
        )
        .await
    }
}
