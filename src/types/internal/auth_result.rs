use std::error::Error;

use crate::types::internal::identity::Identity;

/// Structured answer returned by both coordinators
///
/// Constructed only through the associated functions below so that a token
/// can never sit next to a failure and `errors` can never sit next to a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResult {
    pub(crate) succeeded: bool,
    pub(crate) message: String,
    pub(crate) identity: Option<Identity>,
    pub(crate) token: Option<String>,
    pub(crate) errors: Option<Vec<String>>,
}

impl AuthResult {
    pub fn authenticated(message: impl Into<String>, identity: Identity, token: String) -> Self {
        Self {
            succeeded: true,
            message: message.into(),
            identity: Some(identity),
            token: Some(token),
            errors: None,
        }
    }

    /// Refusal without field errors; the identity may be attached for display
    pub fn rejected(message: impl Into<String>, identity: Option<Identity>) -> Self {
        Self {
            succeeded: false,
            message: message.into(),
            identity,
            token: None,
            errors: None,
        }
    }

    pub fn failed_with_errors(message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            succeeded: false,
            message: message.into(),
            identity: None,
            token: None,
            errors: Some(errors),
        }
    }

    /// Convert an unexpected error into a failure carrying its message chain
    ///
    /// The top-level message becomes the result message; `errors` holds that
    /// message followed by the immediate source, when there is one.
    pub fn from_error(err: &(dyn Error + 'static)) -> Self {
        let message = err.to_string();
        let mut errors = vec![message.clone()];
        if let Some(source) = err.source() {
            errors.push(source.to_string());
        }
        Self::failed_with_errors(message, errors)
    }

    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn errors(&self) -> Option<&[String]> {
        self.errors.as_deref()
    }
}
