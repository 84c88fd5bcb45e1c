use std::sync::Arc;

use sea_orm::DatabaseConnection;
use service::auth::{repo::seaorm::SeaOrmUserRepository, AuthService, PasswordScheme, Plaintext};

/// Shared handler state: the connection pool and the credential checker.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub auth: AuthService<SeaOrmUserRepository>,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_scheme(db, Arc::new(Plaintext))
    }

    pub fn with_scheme(db: DatabaseConnection, scheme: Arc<dyn PasswordScheme>) -> Self {
        let repo = Arc::new(SeaOrmUserRepository { db: db.clone() });
        Self { db, auth: AuthService::new(repo, scheme) }
    }
}
