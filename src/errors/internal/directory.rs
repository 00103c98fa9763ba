use thiserror::Error;

/// Failures raised while talking to the credential directory
///
/// These are infrastructure problems, not sign-in refusals: a wrong password
/// or a locked account is a `SignInOutcome`, never a `DirectoryError`.
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Directory error: {operation} failed")]
    Database {
        operation: String,
        #[source]
        source: sea_orm::DbErr,
    },

    #[error("Password hashing failed: {0}")]
    PasswordHashing(String),

    #[error("Directory call {operation} was cancelled before completing")]
    Cancelled { operation: String },
}

impl DirectoryError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> Self {
        Self::Database {
            operation: operation.to_string(),
            source,
        }
    }

    pub fn cancelled(operation: &str) -> Self {
        Self::Cancelled {
            operation: operation.to_string(),
        }
    }
}
