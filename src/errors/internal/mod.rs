use thiserror::Error;

pub mod directory;

pub use directory::DirectoryError;

/// Error type for store, provider and coordinator operations
///
/// Never crosses the coordinator boundary: coordinators turn it into a
/// failed `AuthResult` before anything reaches the API layer.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error("Crypto error: {operation} failed: {message}")]
    Crypto { operation: String, message: String },
}

impl InternalError {
    pub fn crypto(operation: &str, message: impl Into<String>) -> Self {
        Self::Crypto {
            operation: operation.to_string(),
            message: message.into(),
        }
    }
}
