// Coordinators layer - Workflow orchestration
//
// Coordinators sequence directory calls, outcome mapping and token issuance
// for one request. They are also the error boundary: nothing they return is
// an `Err`.

pub mod login_coordinator;
pub mod registration_coordinator;

pub use login_coordinator::LoginCoordinator;
pub use registration_coordinator::RegistrationCoordinator;

use std::future::Future;
use std::time::Duration;

use crate::errors::{DirectoryError, InternalError};
use crate::stores::CredentialDirectory;
use crate::types::internal::identity::{Identity, SignInOutcome};

// Every interactive sign-in counts towards lockout and never asks for a
// persistent session
const ALLOW_LOCKOUT: bool = true;
const IS_PERSISTENT: bool = false;

/// Await a directory call, abandoning it once `timeout` has elapsed
///
/// An abandoned call is reported as `DirectoryError::Cancelled`; nothing is
/// assumed about whether the directory finished its side of the work.
pub(crate) async fn bounded<T, F>(timeout: Duration, operation: &str, call: F) -> Result<T, InternalError>
where
    F: Future<Output = Result<T, DirectoryError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result.map_err(InternalError::from),
        Err(_) => {
            tracing::warn!(operation, timeout_ms = timeout.as_millis() as u64, "Directory call timed out");
            Err(DirectoryError::cancelled(operation).into())
        }
    }
}

/// Password sign-in with the flags every coordinator uses
pub(crate) async fn password_sign_in(
    directory: &dyn CredentialDirectory,
    timeout: Duration,
    identity: &Identity,
    password: &str,
) -> Result<SignInOutcome, InternalError> {
    bounded(
        timeout,
        "password_sign_in",
        directory.password_sign_in(identity, password, ALLOW_LOCKOUT, IS_PERSISTENT),
    )
    .await
}
