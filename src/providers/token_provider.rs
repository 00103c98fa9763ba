use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::config::{SecretManager, TokenSettings};
use crate::errors::InternalError;
use crate::types::internal::auth::Claims;
use crate::types::internal::identity::Identity;

/// Issues and validates HS256 access tokens
///
/// Holds already-validated configuration only: the signing key comes from an
/// initialized `SecretManager` and the issuer, audience and lifetime from
/// `TokenSettings`, so configuration problems surface at startup rather than
/// on the first login.
pub struct TokenProvider {
    secret_manager: Arc<SecretManager>,
    settings: TokenSettings,
}

impl TokenProvider {
    pub fn new(secret_manager: Arc<SecretManager>, settings: TokenSettings) -> Self {
        Self {
            secret_manager,
            settings,
        }
    }

    pub fn settings(&self) -> &TokenSettings {
        &self.settings
    }

    /// Issue a signed token for a resolved identity
    ///
    /// Subject, name and email claims are copied from `identity` and nothing
    /// else; request input never reaches the claim set.
    ///
    /// # Returns
    /// * `Ok(String)` - Compact JWS representation of the token
    /// * `Err(InternalError)` - Encoding failed
    pub fn issue(&self, identity: &Identity) -> Result<String, InternalError> {
        self.issue_at(identity, Utc::now())
    }

    pub(crate) fn issue_at(&self, identity: &Identity, issued_at: DateTime<Utc>) -> Result<String, InternalError> {
        let expires_at = Duration::try_minutes(self.settings.expiry_minutes())
            .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
            .ok_or_else(|| {
                InternalError::crypto(
                    "jwt_expiry",
                    format!("expiry out of range for {} minutes", self.settings.expiry_minutes()),
                )
            })?;

        let claims = Claims {
            sub: identity.id.clone(),
            name: identity.username.clone(),
            email: identity.email.clone(),
            iss: self.settings.issuer().to_string(),
            aud: self.settings.audience().to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret_manager.jwt_secret().as_bytes()),
        )
        .map_err(|e| InternalError::crypto("jwt_encode", e.to_string()))?;

        tracing::debug!(account_id = %identity.id, jti = %claims.jti, exp = claims.exp, "Issued access token");

        Ok(token)
    }

    /// Validate signature, expiry, issuer and audience and return the claims
    pub fn validate(&self, token: &str) -> Result<Claims, InternalError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.settings.issuer()]);
        validation.set_audience(&[self.settings.audience()]);
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret_manager.jwt_secret().as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => InternalError::crypto("jwt_validate", "token expired"),
            ErrorKind::InvalidSignature => InternalError::crypto("jwt_validate", "invalid signature"),
            ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience => {
                InternalError::crypto("jwt_validate", "issuer or audience mismatch")
            }
            _ => InternalError::crypto("jwt_validate", "malformed token"),
        })
    }
}

impl fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenProvider")
            .field("secret_manager", &"<redacted>")
            .field("issuer", &self.settings.issuer())
            .field("audience", &self.settings.audience())
            .field("expiry_minutes", &self.settings.expiry_minutes())
            .finish()
    }
}

impl fmt::Display for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TokenProvider {{ issuer: {}, audience: {}, expiration: {}min }}",
            self.settings.issuer(),
            self.settings.audience(),
            self.settings.expiry_minutes()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_EXPIRY_MINUTES;
    use crate::test::utils::{test_identity, test_token_provider, TEST_JWT_SECRET};

    fn decode_unchecked_expiry(token: &str, secret: &str) -> Claims {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_audience(&["gatekeeper-clients"]);

        decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
            .unwrap()
            .claims
    }

    #[test]
    fn test_claims_are_taken_from_identity() {
        let provider = test_token_provider(TEST_JWT_SECRET);
        let identity = test_identity("alice");

        let token = provider.issue(&identity).unwrap();
        let claims = provider.validate(&token).unwrap();

        assert_eq!(claims.sub, identity.id);
        assert_eq!(claims.name, "alice");
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.iss, "gatekeeper");
        assert_eq!(claims.aud, "gatekeeper-clients");
    }

    #[test]
    fn test_token_is_compact_jws() {
        let provider = test_token_provider(TEST_JWT_SECRET);

        let token = provider.issue(&test_identity("alice")).unwrap();

        assert_eq!(token.split('.').count(), 3);
        assert!(token.split('.').all(|part| !part.is_empty()));
    }

    #[test]
    fn test_expiry_is_issue_time_plus_configured_minutes() {
        let provider = test_token_provider(TEST_JWT_SECRET);
        let before = Utc::now().timestamp();

        let token = provider.issue(&test_identity("alice")).unwrap();
        let claims = provider.validate(&token).unwrap();
        let after = Utc::now().timestamp();

        let expected_offset = provider.settings().expiry_minutes() * 60;
        assert_eq!(claims.exp - claims.iat, expected_offset);
        assert!(claims.exp >= before + expected_offset);
        assert!(claims.exp <= after + expected_offset);
    }

    #[test]
    fn test_each_token_has_unique_id() {
        let provider = test_token_provider(TEST_JWT_SECRET);
        let identity = test_identity("alice");

        let first = provider.validate(&provider.issue(&identity).unwrap()).unwrap();
        let second = provider.validate(&provider.issue(&identity).unwrap()).unwrap();

        assert_ne!(first.jti, second.jti);
    }

    #[test]
    fn test_tokens_from_different_secrets_do_not_cross_validate() {
        let provider_a = test_token_provider(TEST_JWT_SECRET);
        let provider_b = test_token_provider("a-completely-different-secret-of-32-chars!");
        let identity = test_identity("alice");

        let token_a = provider_a.issue(&identity).unwrap();
        let token_b = provider_b.issue(&identity).unwrap();

        assert!(provider_b.validate(&token_a).is_err());
        assert!(provider_a.validate(&token_b).is_err());
        assert!(provider_a.validate(&token_a).is_ok());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let provider = test_token_provider(TEST_JWT_SECRET);
        let issued_at = Utc::now() - Duration::hours(3);

        let token = provider.issue_at(&test_identity("alice"), issued_at).unwrap();

        let err = provider.validate(&token).unwrap_err();
        assert!(err.to_string().contains("expired"));
        // Still a well-formed token with the expected lifetime
        let claims = decode_unchecked_expiry(&token, TEST_JWT_SECRET);
        assert_eq!(claims.exp - claims.iat, provider.settings().expiry_minutes() * 60);
    }

    #[test]
    fn test_longest_allowed_lifetime_issues_a_token() {
        let secret_manager = Arc::new(SecretManager::from_parts(TEST_JWT_SECRET, "test-pepper-for-unit-tests"));
        let settings = TokenSettings::new("gatekeeper", "gatekeeper-clients", MAX_EXPIRY_MINUTES).unwrap();
        let provider = TokenProvider::new(secret_manager, settings);

        let token = provider.issue(&test_identity("alice")).unwrap();
        let claims = provider.validate(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, MAX_EXPIRY_MINUTES * 60);
    }

    #[test]
    fn test_expiry_past_the_calendar_is_an_error() {
        let provider = test_token_provider(TEST_JWT_SECRET);

        let err = provider
            .issue_at(&test_identity("alice"), DateTime::<Utc>::MAX_UTC)
            .unwrap_err();

        assert!(err.to_string().contains("jwt_expiry"));
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let provider = test_token_provider(TEST_JWT_SECRET);
        let token = provider.issue(&test_identity("alice")).unwrap();

        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_payload = provider.issue(&test_identity("mallory")).unwrap();
        let forged_parts: Vec<&str> = forged_payload.split('.').collect();
        parts[1] = forged_parts[1];
        let tampered = parts.join(".");

        assert!(provider.validate(&tampered).is_err());
    }

    #[test]
    fn test_debug_and_display_do_not_expose_secret() {
        let provider = test_token_provider(TEST_JWT_SECRET);

        let debug_output = format!("{:?}", provider);
        let display_output = format!("{}", provider);

        assert!(debug_output.contains("<redacted>"));
        assert!(!debug_output.contains(TEST_JWT_SECRET));
        assert!(!display_output.contains(TEST_JWT_SECRET));
        assert!(display_output.contains("60min"));
    }
}
