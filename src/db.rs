use sea_orm::sea_query::TableCreateStatement;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, DbErr, Schema,
    Statement,
};
use std::time::Duration;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::entity::{department, employee, role};
use crate::error::{AppError, AppResult};

/// Initialize database connection and auto-migrate tables
pub async fn init_database(config: &DatabaseConfig) -> AppResult<DatabaseConnection> {
    let database_url = config.connection_url()?;

    info!("Connecting to database: {}", config.describe());

    let mut opt = ConnectOptions::new(database_url);
    opt.connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .sqlx_logging(true)
        .sqlx_logging_level(tracing::log::LevelFilter::Debug);

    // One user, one statement at a time.
    if config.is_sqlite() {
        opt.max_connections(1).min_connections(1);
    } else {
        opt.max_connections(1).set_schema_search_path("public");
    }

    connect(opt).await
}

/// Open an in-memory SQLite database with the schema in place
pub async fn init_memory_database() -> AppResult<DatabaseConnection> {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    connect(opt).await
}

async fn connect(opt: ConnectOptions) -> AppResult<DatabaseConnection> {
    let db = Database::connect(opt)
        .await
        .map_err(|e| AppError::storage("connect", e))?;
    info!("Database connection established");

    auto_migrate(&db)
        .await
        .map_err(|e| AppError::storage("auto_migrate", e))?;

    Ok(db)
}

/// Create missing tables in foreign key dependency order
async fn auto_migrate(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    info!("Running auto-migration for all entities...");

    create_table_if_not_exists(db, backend, schema.create_table_from_entity(department::Entity))
        .await?;
    create_table_if_not_exists(db, backend, schema.create_table_from_entity(role::Entity)).await?;
    create_table_if_not_exists(db, backend, schema.create_table_from_entity(employee::Entity))
        .await?;

    info!("Auto-migration completed successfully");
    Ok(())
}

/// Create a table if it doesn't exist
async fn create_table_if_not_exists(
    db: &DatabaseConnection,
    backend: DbBackend,
    mut stmt: TableCreateStatement,
) -> Result<(), DbErr> {
    stmt.if_not_exists();

    let sql = backend.build(&stmt);

    db.execute(Statement::from_string(backend, sql.to_string()))
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{EntityTrait, PaginatorTrait};

    #[tokio::test]
    async fn test_memory_database_has_schema() {
        let db = init_memory_database().await.unwrap();
        assert_eq!(department::Entity::find().count(&db).await.unwrap(), 0);
        assert_eq!(role::Entity::find().count(&db).await.unwrap(), 0);
        assert_eq!(employee::Entity::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_migration_is_idempotent() {
        let db = init_memory_database().await.unwrap();
        auto_migrate(&db).await.unwrap();
    }

    #[tokio::test]
    async fn test_unsupported_backend_is_config_error() {
        let config = DatabaseConfig {
            db_type: "oracle".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            init_database(&config).await,
            Err(AppError::Config(_))
        ));
    }
}
