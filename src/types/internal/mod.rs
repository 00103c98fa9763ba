pub mod auth;
pub mod auth_result;
pub mod identity;
pub mod requests;

pub use auth::Claims;
pub use auth_result::AuthResult;
pub use identity::{CreationOutcome, Identity, SignInOutcome};
pub use requests::{LoginRequest, RegisterRequest};
