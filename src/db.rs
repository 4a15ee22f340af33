use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Schema};

use crate::config::{DatabaseConfig, DEFAULT_SQLITE_URL};
use crate::entities::Vacancies;

/// Connects to the configured store, defaulting to a local sqlite file.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let db_url = if config.is_postgres() {
        config
            .url
            .clone()
            .ok_or_else(|| DbErr::Custom("DATABASE_URL must be set for Postgres".to_string()))?
    } else {
        config
            .url
            .clone()
            .unwrap_or_else(|| DEFAULT_SQLITE_URL.to_string())
    };

    tracing::info!(
        "Connecting to database: {}",
        if config.is_postgres() { "PostgreSQL" } else { "SQLite" }
    );

    Database::connect(&db_url).await
}

/// Creates the `vacancies` table if it does not exist yet.
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut stmt = schema.create_table_from_entity(Vacancies);
    stmt.if_not_exists();
    db.execute(backend.build(&stmt)).await?;
    Ok(())
}
