#![cfg(test)]
use configs::DatabaseConfig;
use models::db::connect_with_config;
use sea_orm::{ConnectionTrait, DatabaseConnection, Schema};

/// Fresh in-memory SQLite store per test with the tables built from the entities.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let cfg = DatabaseConfig {
        url: "sqlite::memory:".into(),
        max_connections: 1,
        min_connections: 1,
        ..DatabaseConfig::default()
    };
    let db = connect_with_config(&cfg).await?;
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    db.execute(backend.build(&schema.create_table_from_entity(models::expense::Entity))).await?;
    db.execute(backend.build(&schema.create_table_from_entity(models::user::Entity))).await?;
    Ok(db)
}
