use crate::types::internal::auth_result::AuthResult;
use crate::types::internal::identity::{CreationOutcome, Identity, SignInOutcome};

/// User-facing messages for every branch of the response taxonomy
pub mod messages {
    pub const AUTHENTICATED: &str = "User authenticated successfully";
    pub const REGISTERED: &str = "User registered successfully";
    pub const ACCOUNT_NOT_FOUND: &str = "Account not found";
    pub const LOCKED_OUT: &str = "Your account has been blocked";
    pub const NOT_ALLOWED: &str = "Account not allowed";
    pub const REQUIRES_TWO_FACTOR: &str =
        "Your account login process requires two-factor authentication";
    pub const UNKNOWN_FAILURE: &str = "Unknown error occurred. Please check your account credentials and retry or contact the admin for further assistance";
    pub const USERNAME_TAKEN: &str = "Username already taken. Please choose another one";
    pub const REGISTRATION_FAILED: &str = "Failed to register user";
    pub const SIGN_IN_AFTER_REGISTRATION_FAILED: &str = "Account created but sign-in failed";
}

/// What a coordinator should do next with a sign-in outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInDisposition {
    /// Credentials accepted; a token should be issued for this identity
    Authenticated(Identity),
    /// Final answer, no token
    Rejected(AuthResult),
}

/// What a coordinator should do next with a creation outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreationDisposition {
    Created(Identity),
    Rejected(AuthResult),
}

/// Map a directory sign-in outcome onto the response taxonomy
///
/// Every refusal except `AccountNotFound` keeps the identity attached so the
/// caller can show account details; none of them carry a token.
pub fn map_sign_in(outcome: SignInOutcome) -> SignInDisposition {
    match outcome {
        SignInOutcome::Success(identity) => SignInDisposition::Authenticated(identity),
        SignInOutcome::AccountNotFound => SignInDisposition::Rejected(account_not_found()),
        SignInOutcome::LockedOut(identity) => {
            SignInDisposition::Rejected(AuthResult::rejected(messages::LOCKED_OUT, Some(identity)))
        }
        SignInOutcome::NotAllowed(identity) => {
            SignInDisposition::Rejected(AuthResult::rejected(messages::NOT_ALLOWED, Some(identity)))
        }
        SignInOutcome::RequiresTwoFactor(identity) => SignInDisposition::Rejected(
            AuthResult::rejected(messages::REQUIRES_TWO_FACTOR, Some(identity)),
        ),
        SignInOutcome::Unknown(identity) => SignInDisposition::Rejected(AuthResult::rejected(
            messages::UNKNOWN_FAILURE,
            Some(identity),
        )),
    }
}

/// Map a directory creation outcome onto the response taxonomy
pub fn map_creation(outcome: CreationOutcome) -> CreationDisposition {
    match outcome {
        CreationOutcome::Success(identity) => CreationDisposition::Created(identity),
        CreationOutcome::DuplicateUsername => CreationDisposition::Rejected(username_taken()),
        CreationOutcome::Failed(errors) => CreationDisposition::Rejected(
            AuthResult::failed_with_errors(messages::REGISTRATION_FAILED, errors),
        ),
    }
}

pub fn account_not_found() -> AuthResult {
    AuthResult::rejected(messages::ACCOUNT_NOT_FOUND, None)
}

pub fn username_taken() -> AuthResult {
    AuthResult::rejected(messages::USERNAME_TAKEN, None)
}
