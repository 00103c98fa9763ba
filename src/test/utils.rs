// Test utilities shared across unit tests
// Only compiled when running tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use argon2::Params;
use async_trait::async_trait;
use sea_orm::{Database, DbErr};
use uuid::Uuid;

use crate::app_data::AppData;
use crate::config::database::ensure_schema;
use crate::config::{ApplicationSettings, LockoutPolicy, SecretManager, TokenSettings};
use crate::errors::DirectoryError;
use crate::providers::TokenProvider;
use crate::stores::{AccountStore, CredentialDirectory};
use crate::types::internal::identity::{CreationOutcome, Identity, SignInOutcome};

pub const TEST_JWT_SECRET: &str = "test-secret-key-minimum-32-characters-long";
pub const TEST_PASSWORD_PEPPER: &str = "test-pepper-for-unit-tests";
pub const TEST_ISSUER: &str = "gatekeeper";
pub const TEST_AUDIENCE: &str = "gatekeeper-clients";
pub const TEST_EXPIRY_MINUTES: i64 = 60;

/// Password accepted by `StubDirectory` for seeded accounts
pub const TEST_PASSWORD: &str = "Correct#1";

pub fn test_identity(username: &str) -> Identity {
    Identity {
        id: Uuid::new_v4().to_string(),
        username: username.to_string(),
        email: format!("{}@example.com", username),
    }
}

pub fn test_token_settings() -> TokenSettings {
    TokenSettings::new(TEST_ISSUER, TEST_AUDIENCE, TEST_EXPIRY_MINUTES)
        .expect("Test token settings should be valid")
}

pub fn test_token_provider(jwt_secret: &str) -> TokenProvider {
    let secret_manager = Arc::new(SecretManager::from_parts(jwt_secret, TEST_PASSWORD_PEPPER));
    TokenProvider::new(secret_manager, test_token_settings())
}

/// Creates an AccountStore over a fresh in-memory database
///
/// Argon2 cost is turned down so hashing does not dominate test time.
pub async fn setup_account_store(lockout: LockoutPolicy) -> AccountStore {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    ensure_schema(&db)
        .await
        .expect("Failed to create account schema");

    let params = Params::new(8 * 1024, 1, 1, None).expect("Test Argon2 params should be valid");
    AccountStore::new(db, TEST_PASSWORD_PEPPER.to_string(), lockout).with_argon2_params(params)
}

/// AppData around the given directory with test secrets and settings
pub fn test_app_data(directory: Arc<dyn CredentialDirectory>) -> AppData {
    let settings = ApplicationSettings {
        database_url: "sqlite::memory:".to_string(),
        bind_address: "127.0.0.1:0".to_string(),
        directory_timeout: Duration::from_secs(5),
        lockout: LockoutPolicy::default(),
    };
    let secret_manager = Arc::new(SecretManager::from_parts(TEST_JWT_SECRET, TEST_PASSWORD_PEPPER));

    AppData::from_parts(settings, secret_manager, test_token_settings(), directory)
}

type SignInScript = Box<dyn Fn(Identity) -> SignInOutcome + Send + Sync>;

/// In-memory CredentialDirectory with scriptable answers
///
/// By default it behaves like a well-formed directory: seeded or created
/// accounts sign in with `TEST_PASSWORD`, anything else is `Unknown`.
/// Scripts and injected failures override that per call kind.
#[derive(Default)]
pub struct StubDirectory {
    accounts: Mutex<Vec<Identity>>,
    sign_in_script: Mutex<Option<SignInScript>>,
    creation_script: Mutex<Option<CreationOutcome>>,
    lookup_failure: Mutex<Option<String>>,
    creation_failure: Mutex<Option<String>>,
    sign_in_delay: Mutex<Option<Duration>>,
    last_sign_in_flags: Mutex<Option<(bool, bool)>>,
    create_calls: AtomicUsize,
    sign_in_calls: AtomicUsize,
}

impl StubDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, username: &str, email: &str) -> Identity {
        let identity = Identity {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            email: email.to_string(),
        };
        self.accounts.lock().unwrap().push(identity.clone());
        identity
    }

    /// Every following sign-in returns `outcome`
    pub fn script_sign_in(&self, outcome: SignInOutcome) {
        self.script_sign_in_with(move |_| outcome.clone());
    }

    /// Every following sign-in returns `script(identity)`
    pub fn script_sign_in_with<F>(&self, script: F)
    where
        F: Fn(Identity) -> SignInOutcome + Send + Sync + 'static,
    {
        *self.sign_in_script.lock().unwrap() = Some(Box::new(script));
    }

    pub fn script_creation(&self, outcome: CreationOutcome) {
        *self.creation_script.lock().unwrap() = Some(outcome);
    }

    pub fn fail_lookups_with(&self, message: &str) {
        *self.lookup_failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_creation_with(&self, message: &str) {
        *self.creation_failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn delay_sign_in(&self, delay: Duration) {
        *self.sign_in_delay.lock().unwrap() = Some(delay);
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn sign_in_calls(&self) -> usize {
        self.sign_in_calls.load(Ordering::SeqCst)
    }

    /// `(allow_lockout, is_persistent)` of the most recent sign-in
    pub fn last_sign_in_flags(&self) -> Option<(bool, bool)> {
        *self.last_sign_in_flags.lock().unwrap()
    }

    fn check_lookup(&self, operation: &str) -> Result<(), DirectoryError> {
        match self.lookup_failure.lock().unwrap().as_ref() {
            Some(message) => Err(DirectoryError::database(operation, DbErr::Custom(message.clone()))),
            None => Ok(()),
        }
    }

    fn find(&self, matches: impl Fn(&Identity) -> bool) -> Option<Identity> {
        self.accounts.lock().unwrap().iter().find(|i| matches(i)).cloned()
    }
}

#[async_trait]
impl CredentialDirectory for StubDirectory {
    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, DirectoryError> {
        self.check_lookup("find_by_username")?;
        Ok(self.find(|i| i.username.eq_ignore_ascii_case(username)))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, DirectoryError> {
        self.check_lookup("find_by_email")?;
        Ok(self.find(|i| i.email.eq_ignore_ascii_case(email)))
    }

    async fn create_account(
        &self,
        username: &str,
        email: &str,
        _password: &str,
    ) -> Result<CreationOutcome, DirectoryError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = self.creation_failure.lock().unwrap().as_ref() {
            return Err(DirectoryError::database(
                "create_account",
                DbErr::Custom(message.clone()),
            ));
        }
        if let Some(outcome) = self.creation_script.lock().unwrap().clone() {
            return Ok(outcome);
        }

        Ok(CreationOutcome::Success(self.seed(username, email)))
    }

    async fn password_sign_in(
        &self,
        identity: &Identity,
        password: &str,
        allow_lockout: bool,
        is_persistent: bool,
    ) -> Result<SignInOutcome, DirectoryError> {
        self.sign_in_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_sign_in_flags.lock().unwrap() = Some((allow_lockout, is_persistent));

        let delay = *self.sign_in_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(script) = self.sign_in_script.lock().unwrap().as_ref() {
            return Ok(script(identity.clone()));
        }

        let known = self.find(|i| i.id == identity.id);
        Ok(match known {
            None => SignInOutcome::AccountNotFound,
            Some(identity) if password == TEST_PASSWORD => SignInOutcome::Success(identity),
            Some(identity) => SignInOutcome::Unknown(identity),
        })
    }
}
