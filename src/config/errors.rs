use std::fmt;

use super::secret_manager::SecretError;

/// Startup configuration failures
///
/// Every variant is fatal: `main` logs it and exits before the server binds.
/// None of these are ever produced while serving a request.
#[derive(Debug)]
pub enum ConfigError {
    MissingSetting { setting_name: String },
    InvalidFormat { setting_name: String, expected: String, actual: String },
    Secret(SecretError),
    Database(String),
}

impl ConfigError {
    pub fn missing(setting_name: &str) -> Self {
        Self::MissingSetting {
            setting_name: setting_name.to_string(),
        }
    }

    pub fn invalid_format(setting_name: &str, expected: &str, actual: &str) -> Self {
        Self::InvalidFormat {
            setting_name: setting_name.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSetting { setting_name } => {
                write!(f, "Required setting '{}' is missing", setting_name)
            }
            Self::InvalidFormat { setting_name, expected, actual } => {
                write!(
                    f,
                    "Setting '{}' has invalid format. Expected: {}, got: {}",
                    setting_name, expected, actual
                )
            }
            Self::Secret(err) => write!(f, "Secret error: {}", err),
            Self::Database(msg) => write!(f, "Database initialization error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Secret(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SecretError> for ConfigError {
    fn from(err: SecretError) -> Self {
        Self::Secret(err)
    }
}
