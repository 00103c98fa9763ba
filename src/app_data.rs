use std::sync::Arc;

use crate::config::{
    init_database, ApplicationSettings, ConfigError, EnvironmentProvider, SecretManager, TokenSettings,
};
use crate::providers::TokenProvider;
use crate::stores::{AccountStore, CredentialDirectory};

/// Shared application state, built once in `main`
///
/// ```text
/// main.rs
///   ↓
/// AppData::init(env)
///   ├─ settings        (ApplicationSettings)
///   ├─ secret_manager  (Arc<SecretManager>)
///   ├─ directory       (Arc<dyn CredentialDirectory>, AccountStore in production)
///   └─ token_provider  (Arc<TokenProvider>)
///   ↓ wrapped in Arc<AppData>
///   ├─ LoginCoordinator::new(app_data)
///   └─ RegistrationCoordinator::new(app_data)
/// ```
pub struct AppData {
    pub settings: ApplicationSettings,
    pub secret_manager: Arc<SecretManager>,
    pub directory: Arc<dyn CredentialDirectory>,
    pub token_provider: Arc<TokenProvider>,
}

impl AppData {
    /// Load configuration, connect the account database and build providers
    ///
    /// All settings are read and validated before anything connects, so a
    /// missing signing key or malformed expiry stops startup immediately.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for any missing or malformed setting, or when the
    /// database cannot be opened
    pub async fn init(env: &dyn EnvironmentProvider) -> Result<Self, ConfigError> {
        tracing::info!("Initializing AppData...");

        let secret_manager = Arc::new(SecretManager::init(env)?);
        let token_settings = TokenSettings::from_env(env)?;
        let settings = ApplicationSettings::from_env(env)?;
        tracing::debug!(%secret_manager, ?token_settings, "Configuration loaded");

        let db = init_database(&settings.database_url).await?;
        let directory: Arc<dyn CredentialDirectory> = Arc::new(AccountStore::new(
            db,
            secret_manager.password_pepper().to_string(),
            settings.lockout.clone(),
        ));

        let app_data = Self::from_parts(settings, secret_manager, token_settings, directory);

        tracing::info!(token_provider = %app_data.token_provider, "AppData initialization complete");
        Ok(app_data)
    }

    /// Assemble AppData around an existing directory
    pub fn from_parts(
        settings: ApplicationSettings,
        secret_manager: Arc<SecretManager>,
        token_settings: TokenSettings,
        directory: Arc<dyn CredentialDirectory>,
    ) -> Self {
        let token_provider = Arc::new(TokenProvider::new(secret_manager.clone(), token_settings));

        Self {
            settings,
            secret_manager,
            directory,
            token_provider,
        }
    }
}
