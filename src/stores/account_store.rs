use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set,
    SqlErr,
};
use uuid::Uuid;

use crate::config::LockoutPolicy;
use crate::errors::DirectoryError;
use crate::stores::account_validator::AccountValidator;
use crate::stores::credential_directory::CredentialDirectory;
use crate::types::db::account;
use crate::types::internal::identity::{CreationOutcome, Identity, SignInOutcome};

/// SQLite-backed credential directory
///
/// Stores accounts with Argon2id password hashes (peppered with a server
/// secret), tracks failed attempts and lockout windows, and enforces the
/// confirmation and two-factor flags during sign-in.
pub struct AccountStore {
    db: DatabaseConnection,
    password_pepper: String,
    lockout: LockoutPolicy,
    argon2_params: Params,
    validator: AccountValidator,
}

impl AccountStore {
    /// Create a new AccountStore
    ///
    /// # Arguments
    /// * `db` - Connection to a database with the accounts table in place
    /// * `password_pepper` - Secret mixed into every password hash (from SecretManager)
    /// * `lockout` - Failed-attempt and confirmation policy
    pub fn new(db: DatabaseConnection, password_pepper: String, lockout: LockoutPolicy) -> Self {
        Self {
            db,
            password_pepper,
            lockout,
            argon2_params: Params::default(),
            validator: AccountValidator::new(),
        }
    }

    /// Override the Argon2 cost parameters
    pub fn with_argon2_params(mut self, params: Params) -> Self {
        self.argon2_params = params;
        self
    }

    fn argon2(&self) -> Result<Argon2<'_>, DirectoryError> {
        Argon2::new_with_secret(
            self.password_pepper.as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            self.argon2_params.clone(),
        )
        .map_err(|e| DirectoryError::PasswordHashing(format!("argon2 init: {}", e)))
    }

    fn hash_password(&self, password: &str) -> Result<String, DirectoryError> {
        let salt = SaltString::generate(&mut rand_core::OsRng);

        self.argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DirectoryError::PasswordHashing(e.to_string()))
    }

    fn verify_password(&self, password_hash: &str, password: &str) -> Result<bool, DirectoryError> {
        let parsed = PasswordHash::new(password_hash)
            .map_err(|e| DirectoryError::PasswordHashing(format!("stored hash unreadable: {}", e)))?;

        match self.argon2()?.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(DirectoryError::PasswordHashing(e.to_string())),
        }
    }

    async fn find_model_by_id(&self, id: &str) -> Result<Option<account::Model>, DirectoryError> {
        account::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| DirectoryError::database("find_account_by_id", e))
    }

    /// Number of stored accounts
    pub async fn account_count(&self) -> Result<u64, DirectoryError> {
        account::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| DirectoryError::database("account_count", e))
    }

    /// Mark an account's email as confirmed (or not)
    pub async fn set_email_confirmed(&self, id: &str, confirmed: bool) -> Result<(), DirectoryError> {
        self.update_flags(id, "set_email_confirmed", |active| {
            active.email_confirmed = Set(confirmed);
        })
        .await
    }

    /// Enable or disable two-factor sign-in for an account
    pub async fn set_two_factor_enabled(&self, id: &str, enabled: bool) -> Result<(), DirectoryError> {
        self.update_flags(id, "set_two_factor_enabled", |active| {
            active.two_factor_enabled = Set(enabled);
        })
        .await
    }

    async fn update_flags<F>(&self, id: &str, operation: &str, apply: F) -> Result<(), DirectoryError>
    where
        F: FnOnce(&mut account::ActiveModel),
    {
        let model = self
            .find_model_by_id(id)
            .await?
            .ok_or_else(|| DirectoryError::database(operation, sea_orm::DbErr::RecordNotFound(id.to_string())))?;

        let mut active: account::ActiveModel = model.into();
        apply(&mut active);
        active
            .update(&self.db)
            .await
            .map_err(|e| DirectoryError::database(operation, e))?;

        Ok(())
    }

    async fn record_failed_attempt(
        &self,
        model: account::Model,
        now: i64,
    ) -> Result<SignInOutcome, DirectoryError> {
        let identity = Identity::from(&model);
        let failed_count = model.access_failed_count + 1;
        let mut active: account::ActiveModel = model.into();

        let outcome = if failed_count >= self.lockout.max_failed_attempts {
            active.access_failed_count = Set(0);
            active.lockout_end = Set(Some(now + self.lockout.lockout_minutes * 60));
            tracing::warn!(account_id = %identity.id, "Account locked after repeated failed sign-ins");
            SignInOutcome::LockedOut(identity)
        } else {
            active.access_failed_count = Set(failed_count);
            SignInOutcome::Unknown(identity)
        };

        active
            .update(&self.db)
            .await
            .map_err(|e| DirectoryError::database("record_failed_attempt", e))?;

        Ok(outcome)
    }

    async fn reset_failed_attempts(&self, model: &account::Model) -> Result<(), DirectoryError> {
        if model.access_failed_count == 0 && model.lockout_end.is_none() {
            return Ok(());
        }

        let mut active: account::ActiveModel = model.clone().into();
        active.access_failed_count = Set(0);
        active.lockout_end = Set(None);
        active
            .update(&self.db)
            .await
            .map_err(|e| DirectoryError::database("reset_failed_attempts", e))?;

        Ok(())
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_uppercase()
}

fn is_locked_out(model: &account::Model, now: i64) -> bool {
    model.lockout_enabled && model.lockout_end.is_some_and(|end| end > now)
}

#[async_trait]
impl CredentialDirectory for AccountStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, DirectoryError> {
        let model = account::Entity::find()
            .filter(account::Column::NormalizedUsername.eq(normalize(username)))
            .one(&self.db)
            .await
            .map_err(|e| DirectoryError::database("find_by_username", e))?;

        Ok(model.map(Identity::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, DirectoryError> {
        let model = account::Entity::find()
            .filter(account::Column::NormalizedEmail.eq(normalize(email)))
            .one(&self.db)
            .await
            .map_err(|e| DirectoryError::database("find_by_email", e))?;

        Ok(model.map(Identity::from))
    }

    async fn create_account(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<CreationOutcome, DirectoryError> {
        let violations = self.validator.validate(username, email, password);
        if !violations.is_empty() {
            return Ok(CreationOutcome::Failed(
                violations.iter().map(|v| v.to_string()).collect(),
            ));
        }

        let password_hash = self.hash_password(password)?;

        let new_account = account::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            username: Set(username.to_string()),
            normalized_username: Set(normalize(username)),
            email: Set(email.to_string()),
            normalized_email: Set(normalize(email)),
            password_hash: Set(password_hash),
            email_confirmed: Set(false),
            two_factor_enabled: Set(false),
            lockout_enabled: Set(true),
            access_failed_count: Set(0),
            lockout_end: Set(None),
            created_at: Set(Utc::now().timestamp()),
        };

        match new_account.insert(&self.db).await {
            Ok(model) => {
                tracing::info!(account_id = %model.id, "Account created");
                Ok(CreationOutcome::Success(Identity::from(model)))
            }
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Ok(CreationOutcome::DuplicateUsername)
            }
            Err(e) => Err(DirectoryError::database("create_account", e)),
        }
    }

    async fn password_sign_in(
        &self,
        identity: &Identity,
        password: &str,
        allow_lockout: bool,
        is_persistent: bool,
    ) -> Result<SignInOutcome, DirectoryError> {
        // No session cookies here, so persistence has nothing to change
        tracing::debug!(account_id = %identity.id, is_persistent, "Password sign-in attempt");

        let Some(model) = self.find_model_by_id(&identity.id).await? else {
            return Ok(SignInOutcome::AccountNotFound);
        };
        let now = Utc::now().timestamp();

        if self.lockout.require_confirmed_account && !model.email_confirmed {
            return Ok(SignInOutcome::NotAllowed(Identity::from(model)));
        }

        if is_locked_out(&model, now) {
            return Ok(SignInOutcome::LockedOut(Identity::from(model)));
        }

        if self.verify_password(&model.password_hash, password)? {
            self.reset_failed_attempts(&model).await?;

            if model.two_factor_enabled {
                return Ok(SignInOutcome::RequiresTwoFactor(Identity::from(model)));
            }
            return Ok(SignInOutcome::Success(Identity::from(model)));
        }

        if allow_lockout && model.lockout_enabled {
            return self.record_failed_attempt(model, now).await;
        }

        Ok(SignInOutcome::Unknown(Identity::from(model)))
    }
}
