// Common test utilities for integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use argon2::Params;
use sea_orm::Database;

use gatekeeper_backend::app_data::AppData;
use gatekeeper_backend::config::database::ensure_schema;
use gatekeeper_backend::config::{
    ApplicationSettings, EnvironmentProvider, LockoutPolicy, SecretManager, TokenSettings,
};
use gatekeeper_backend::stores::AccountStore;

pub const JWT_SECRET: &str = "integration-secret-key-minimum-32-characters";
pub const PASSWORD_PEPPER: &str = "integration-pepper-16";
pub const PASSWORD: &str = "Correct#1";

/// Environment backed by a fixed map, so tests never touch process state
#[derive(Default)]
pub struct MapEnvironment {
    vars: HashMap<String, String>,
}

impl MapEnvironment {
    /// Every setting startup requires, with valid values
    pub fn valid() -> Self {
        Self::default()
            .with("JWT_SECRET", JWT_SECRET)
            .with("PASSWORD_PEPPER", PASSWORD_PEPPER)
            .with("JWT_ISSUER", "gatekeeper")
            .with("JWT_AUDIENCE", "gatekeeper-clients")
            .with("JWT_EXPIRY_MINUTES", "60")
            .with("DATABASE_URL", "sqlite::memory:")
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }

    pub fn without(mut self, key: &str) -> Self {
        self.vars.remove(key);
        self
    }
}

impl EnvironmentProvider for MapEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Creates an AccountStore over a fresh in-memory database
pub async fn setup_account_store(lockout: LockoutPolicy) -> Arc<AccountStore> {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    ensure_schema(&db)
        .await
        .expect("Failed to create account schema");

    let params = Params::new(8 * 1024, 1, 1, None).expect("Test Argon2 params should be valid");
    Arc::new(
        AccountStore::new(db, PASSWORD_PEPPER.to_string(), lockout).with_argon2_params(params),
    )
}

pub fn token_settings() -> TokenSettings {
    TokenSettings::new("gatekeeper", "gatekeeper-clients", 60).expect("Token settings should be valid")
}

/// AppData wired to a real AccountStore
pub fn app_data(store: Arc<AccountStore>, jwt_secret: &str) -> Arc<AppData> {
    let settings = ApplicationSettings {
        database_url: "sqlite::memory:".to_string(),
        bind_address: "127.0.0.1:0".to_string(),
        directory_timeout: Duration::from_secs(5),
        lockout: LockoutPolicy::default(),
    };
    let secret_manager = Arc::new(SecretManager::from_parts(jwt_secret, PASSWORD_PEPPER));

    Arc::new(AppData::from_parts(settings, secret_manager, token_settings(), store))
}
