// Seed an account directly through the account store

use crate::config::{init_database, ApplicationSettings, EnvironmentProvider, SecretManager};
use crate::stores::{AccountStore, CredentialDirectory};
use crate::types::internal::identity::{CreationOutcome, Identity};

/// Arguments for `create-account`
#[derive(Clone, clap::Args)]
pub struct CreateAccountArgs {
    /// Username for the new account
    #[arg(long)]
    pub username: String,

    /// Email address for the new account
    #[arg(long)]
    pub email: String,

    /// Password for the new account
    #[arg(long)]
    pub password: String,

    /// Mark the email address as already confirmed
    #[arg(long)]
    pub confirmed: bool,
}

impl std::fmt::Debug for CreateAccountArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateAccountArgs")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("confirmed", &self.confirmed)
            .finish()
    }
}

/// Open the account database described by `env` and create one account
///
/// Only the password pepper and database settings are needed; token settings
/// are not read.
pub async fn run(
    env: &dyn EnvironmentProvider,
    args: CreateAccountArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let secret_manager = SecretManager::init(env)?;
    let settings = ApplicationSettings::from_env(env)?;
    let db = init_database(&settings.database_url).await?;
    let store = AccountStore::new(db, secret_manager.password_pepper().to_string(), settings.lockout);

    let identity = seed_account(&store, &args).await?;
    let total = store.account_count().await?;

    println!("\n✓ Account created");
    println!("  Username: {}", identity.username);
    println!("  Email: {}", identity.email);
    println!("  ID: {}", identity.id);
    println!("  Email confirmed: {}", args.confirmed);
    println!("  Total accounts: {}\n", total);

    Ok(())
}

/// Create the account described by `args`, confirming it when asked
pub async fn seed_account(
    store: &AccountStore,
    args: &CreateAccountArgs,
) -> Result<Identity, Box<dyn std::error::Error>> {
    let outcome = store
        .create_account(&args.username, &args.email, &args.password)
        .await?;

    let identity = match outcome {
        CreationOutcome::Success(identity) => identity,
        CreationOutcome::DuplicateUsername => {
            return Err(format!("Username '{}' is already taken", args.username).into());
        }
        CreationOutcome::Failed(errors) => {
            return Err(format!("Account rejected:\n  - {}", errors.join("\n  - ")).into());
        }
    };

    if args.confirmed {
        store.set_email_confirmed(&identity.id, true).await?;
    }

    tracing::info!(account_id = %identity.id, confirmed = args.confirmed, "Account created from CLI");
    Ok(identity)
}
