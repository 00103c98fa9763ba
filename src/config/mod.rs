mod application_settings;
pub mod database;
mod env_provider;
mod errors;
mod logging;
mod secret_config;
mod secret_manager;
mod token_settings;

pub use application_settings::{ApplicationSettings, LockoutPolicy};
pub use database::init_database;
#[cfg(test)]
pub use env_provider::MockEnvironment;
pub use env_provider::{EnvironmentProvider, SystemEnvironment};
pub use errors::ConfigError;
pub use logging::{init_logging, LoggingConfig, LoggingError};
pub use secret_config::{SecretConfig, SecretType};
pub use secret_manager::{SecretError, SecretManager};
pub use token_settings::{TokenSettings, MAX_EXPIRY_MINUTES};
