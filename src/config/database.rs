use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

use crate::config::ConfigError;
use crate::types::db::account;

/// Connect to the account database and make sure the accounts table exists
///
/// Runs once at startup; any failure here aborts the process.
pub async fn init_database(database_url: &str) -> Result<DatabaseConnection, ConfigError> {
    let db = Database::connect(database_url)
        .await
        .map_err(|e| ConfigError::Database(format!("connect failed: {}", e)))?;

    tracing::debug!("Connected to account database");

    ensure_schema(&db)
        .await
        .map_err(|e| ConfigError::Database(format!("schema setup failed: {}", e)))?;

    Ok(db)
}

/// Create the accounts table from the entity definition if it is missing
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), sea_orm::DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut statement = schema.create_table_from_entity(account::Entity);
    statement.if_not_exists();

    db.execute(backend.build(&statement)).await?;

    tracing::debug!("Account schema ready");
    Ok(())
}
