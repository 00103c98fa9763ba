use poem_openapi::{payload::Json, ApiResponse, Object};
use serde::{Deserialize, Serialize};

use crate::types::internal::auth_result::AuthResult;
use crate::types::internal::identity::Identity;
use crate::types::internal::requests;

/// Request model for login
#[derive(Object, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Username or email address
    pub identifier: String,

    /// Password for authentication
    pub password: String,
}

impl From<LoginRequest> for requests::LoginRequest {
    fn from(dto: LoginRequest) -> Self {
        Self {
            identifier: dto.identifier,
            password: dto.password,
        }
    }
}

/// Request model for account registration
#[derive(Object, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Desired username
    pub username: String,

    /// Email address for the account
    pub email: String,

    /// Password, checked against the account password policy
    pub password: String,
}

impl From<RegisterRequest> for requests::RegisterRequest {
    fn from(dto: RegisterRequest) -> Self {
        Self {
            username: dto.username,
            email: dto.email,
            password: dto.password,
        }
    }
}

/// Public view of an account
#[derive(Object, Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IdentityResponse {
    /// Account ID (UUID)
    pub id: String,

    pub username: String,

    pub email: String,
}

impl From<Identity> for IdentityResponse {
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.id,
            username: identity.username,
            email: identity.email,
        }
    }
}

/// Outcome of a login or registration request
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Whether the caller is now authenticated
    pub succeeded: bool,

    /// Human-readable outcome
    pub message: String,

    /// Account the request resolved to, when known
    #[oai(skip_serializing_if_is_none)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<IdentityResponse>,

    /// Signed JWT, present only when `succeeded` is true
    #[oai(skip_serializing_if_is_none)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Field-level or diagnostic errors
    #[oai(skip_serializing_if_is_none)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl From<AuthResult> for AuthResponse {
    fn from(result: AuthResult) -> Self {
        Self {
            succeeded: result.succeeded,
            message: result.message,
            identity: result.identity.map(IdentityResponse::from),
            token: result.token,
            errors: result.errors,
        }
    }
}

/// API response for login endpoint
#[derive(ApiResponse)]
pub enum LoginApiResponse {
    /// Authentication successful, token provided
    #[oai(status = 200)]
    Ok(Json<AuthResponse>),

    /// Sign-in refused or failed
    #[oai(status = 401)]
    Unauthorized(Json<AuthResponse>),
}

impl From<AuthResult> for LoginApiResponse {
    fn from(result: AuthResult) -> Self {
        if result.succeeded() {
            Self::Ok(Json(result.into()))
        } else {
            Self::Unauthorized(Json(result.into()))
        }
    }
}

/// API response for register endpoint
#[derive(ApiResponse)]
pub enum RegisterApiResponse {
    /// Account created and signed in, token provided
    #[oai(status = 200)]
    Ok(Json<AuthResponse>),

    /// Registration refused or failed
    #[oai(status = 400)]
    BadRequest(Json<AuthResponse>),
}

impl From<AuthResult> for RegisterApiResponse {
    fn from(result: AuthResult) -> Self {
        if result.succeeded() {
            Self::Ok(Json(result.into()))
        } else {
            Self::BadRequest(Json(result.into()))
        }
    }
}
