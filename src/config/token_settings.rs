use crate::config::{ConfigError, EnvironmentProvider};

/// Issuer, audience and lifetime of issued access tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSettings {
    issuer: String,
    audience: String,
    expiry_minutes: i64,
}

impl TokenSettings {
    pub const ISSUER: &'static str = "JWT_ISSUER";
    pub const AUDIENCE: &'static str = "JWT_AUDIENCE";
    pub const EXPIRY_MINUTES: &'static str = "JWT_EXPIRY_MINUTES";

    /// Load token settings, failing on anything missing or malformed
    ///
    /// There are no defaults here: a token issued with a guessed issuer or
    /// lifetime would be accepted or rejected downstream for the wrong reason.
    pub fn from_env(env: &dyn EnvironmentProvider) -> Result<Self, ConfigError> {
        let issuer = env
            .get_non_empty(Self::ISSUER)
            .ok_or_else(|| ConfigError::missing(Self::ISSUER))?;
        let audience = env
            .get_non_empty(Self::AUDIENCE)
            .ok_or_else(|| ConfigError::missing(Self::AUDIENCE))?;
        let raw_expiry = env
            .get_non_empty(Self::EXPIRY_MINUTES)
            .ok_or_else(|| ConfigError::missing(Self::EXPIRY_MINUTES))?;

        let expiry_minutes = parse_expiry_minutes(&raw_expiry)?;

        Ok(Self {
            issuer,
            audience,
            expiry_minutes,
        })
    }

    /// Build settings from explicit values with the same validation as `from_env`
    pub fn new(
        issuer: impl Into<String>,
        audience: impl Into<String>,
        expiry_minutes: i64,
    ) -> Result<Self, ConfigError> {
        let issuer = issuer.into();
        let audience = audience.into();

        if issuer.trim().is_empty() {
            return Err(ConfigError::missing(Self::ISSUER));
        }
        if audience.trim().is_empty() {
            return Err(ConfigError::missing(Self::AUDIENCE));
        }
        let expiry_minutes = check_expiry_minutes(expiry_minutes, &expiry_minutes.to_string())?;

        Ok(Self {
            issuer,
            audience,
            expiry_minutes,
        })
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn expiry_minutes(&self) -> i64 {
        self.expiry_minutes
    }
}

/// Longest accepted token lifetime: ten years
pub const MAX_EXPIRY_MINUTES: i64 = 10 * 365 * 24 * 60;

const EXPECTED_EXPIRY: &str = "positive integer up to 5256000 (minutes)";

fn parse_expiry_minutes(raw: &str) -> Result<i64, ConfigError> {
    let minutes = raw.parse::<i64>().map_err(|_| {
        ConfigError::invalid_format(TokenSettings::EXPIRY_MINUTES, EXPECTED_EXPIRY, raw)
    })?;
    check_expiry_minutes(minutes, raw)
}

fn check_expiry_minutes(minutes: i64, raw: &str) -> Result<i64, ConfigError> {
    if (1..=MAX_EXPIRY_MINUTES).contains(&minutes) {
        Ok(minutes)
    } else {
        Err(ConfigError::invalid_format(
            TokenSettings::EXPIRY_MINUTES,
            EXPECTED_EXPIRY,
            raw,
        ))
    }
}
