use serde::{Deserialize, Serialize};

/// JWT claims carried by issued access tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account id)
    pub sub: String,

    /// Username
    pub name: String,

    pub email: String,

    pub iss: String,

    pub aud: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Unique token id
    pub jti: String,
}
