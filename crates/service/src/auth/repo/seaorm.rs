use sea_orm::DatabaseConnection;

use crate::auth::domain::Credentials;
use crate::auth::errors::AuthError;
use crate::auth::repository::UserRepository;
use crate::user;

#[derive(Clone)]
pub struct SeaOrmUserRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Credentials>, AuthError> {
        let res = user::get_by_email(&self.db, email)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(Credentials::from))
    }

    async fn find_by_login(&self, identifier: &str) -> Result<Vec<Credentials>, AuthError> {
        let rows = user::find_by_login(&self.db, identifier)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(rows.into_iter().map(Credentials::from).collect())
    }
}
