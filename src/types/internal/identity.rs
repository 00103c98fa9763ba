use crate::types::db::account;

/// Read-only view of a directory account
///
/// This is all the core ever sees of an account; everything else (hash,
/// lockout counters, flags) stays inside the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub username: String,
    pub email: String,
}

impl From<account::Model> for Identity {
    fn from(model: account::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
        }
    }
}

impl From<&account::Model> for Identity {
    fn from(model: &account::Model) -> Self {
        Self {
            id: model.id.clone(),
            username: model.username.clone(),
            email: model.email.clone(),
        }
    }
}

/// Result of a single password sign-in attempt as classified by the directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInOutcome {
    Success(Identity),
    AccountNotFound,
    LockedOut(Identity),
    NotAllowed(Identity),
    RequiresTwoFactor(Identity),
    /// Any other refusal, including a wrong password
    Unknown(Identity),
}

impl SignInOutcome {
    /// Short label used in log events
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::AccountNotFound => "account_not_found",
            Self::LockedOut(_) => "locked_out",
            Self::NotAllowed(_) => "not_allowed",
            Self::RequiresTwoFactor(_) => "requires_two_factor",
            Self::Unknown(_) => "unknown",
        }
    }
}

/// Result of an account creation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreationOutcome {
    Success(Identity),
    DuplicateUsername,
    /// Field-level validation failures, human readable
    Failed(Vec<String>),
}
