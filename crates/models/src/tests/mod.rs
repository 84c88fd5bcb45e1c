
use anyhow::Result;
use configs::DatabaseConfig;
use sea_orm::{ConnectionTrait, DatabaseConnection, Schema};

use crate::{db, expense, user};

/// Fresh in-memory store with both tables created from the entity definitions.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let cfg = DatabaseConfig {
        url: "sqlite::memory:".into(),
        max_connections: 1,
        min_connections: 1,
        connect_attempts: 1,
        ..DatabaseConfig::default()
    };
    let db = db::connect_with_config(&cfg).await?;
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    db.execute(backend.build(&schema.create_table_from_entity(expense::Entity))).await?;
    db.execute(backend.build(&schema.create_table_from_entity(user::Entity))).await?;
    Ok(db)
}
