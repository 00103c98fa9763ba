use std::str::FromStr;
use std::time::Duration;

use crate::config::{ConfigError, EnvironmentProvider};

const DEFAULT_DATABASE_URL: &str = "sqlite://gatekeeper.db?mode=rwc";
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
const DEFAULT_DIRECTORY_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_LOCKOUT_MAX_FAILED_ATTEMPTS: i32 = 5;
const DEFAULT_LOCKOUT_MINUTES: i64 = 5;

/// Lockout and confirmation rules enforced by the account store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockoutPolicy {
    pub max_failed_attempts: i32,
    pub lockout_minutes: i64,
    pub require_confirmed_account: bool,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_failed_attempts: DEFAULT_LOCKOUT_MAX_FAILED_ATTEMPTS,
            lockout_minutes: DEFAULT_LOCKOUT_MINUTES,
            require_confirmed_account: false,
        }
    }
}

/// Non-secret runtime settings
///
/// Unset values fall back to defaults; values that are set but cannot be
/// parsed are a startup error rather than being silently replaced.
#[derive(Debug, Clone)]
pub struct ApplicationSettings {
    pub database_url: String,
    pub bind_address: String,
    pub directory_timeout: Duration,
    pub lockout: LockoutPolicy,
}

impl ApplicationSettings {
    pub fn from_env(env: &dyn EnvironmentProvider) -> Result<Self, ConfigError> {
        let database_url = env
            .get_non_empty("DATABASE_URL")
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let bind_address = env
            .get_non_empty("BIND_ADDRESS")
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let timeout_seconds: u64 = parse_or_default(
            env,
            "DIRECTORY_TIMEOUT_SECONDS",
            "positive integer (seconds)",
            DEFAULT_DIRECTORY_TIMEOUT_SECONDS,
        )?;
        if timeout_seconds == 0 {
            return Err(ConfigError::invalid_format(
                "DIRECTORY_TIMEOUT_SECONDS",
                "positive integer (seconds)",
                "0",
            ));
        }

        let max_failed_attempts: i32 = parse_or_default(
            env,
            "LOCKOUT_MAX_FAILED_ATTEMPTS",
            "positive integer",
            DEFAULT_LOCKOUT_MAX_FAILED_ATTEMPTS,
        )?;
        if max_failed_attempts <= 0 {
            return Err(ConfigError::invalid_format(
                "LOCKOUT_MAX_FAILED_ATTEMPTS",
                "positive integer",
                &max_failed_attempts.to_string(),
            ));
        }

        let lockout_minutes: i64 = parse_or_default(
            env,
            "LOCKOUT_MINUTES",
            "positive integer (minutes)",
            DEFAULT_LOCKOUT_MINUTES,
        )?;
        if lockout_minutes <= 0 {
            return Err(ConfigError::invalid_format(
                "LOCKOUT_MINUTES",
                "positive integer (minutes)",
                &lockout_minutes.to_string(),
            ));
        }

        let require_confirmed_account: bool =
            parse_or_default(env, "REQUIRE_CONFIRMED_ACCOUNT", "true or false", false)?;

        Ok(Self {
            database_url,
            bind_address,
            directory_timeout: Duration::from_secs(timeout_seconds),
            lockout: LockoutPolicy {
                max_failed_attempts,
                lockout_minutes,
                require_confirmed_account,
            },
        })
    }
}

fn parse_or_default<T: FromStr>(
    env: &dyn EnvironmentProvider,
    key: &str,
    expected: &str,
    default: T,
) -> Result<T, ConfigError> {
    match env.get_non_empty(key) {
        None => Ok(default),
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| ConfigError::invalid_format(key, expected, &raw)),
    }
}
