use async_trait::async_trait;

use super::domain::Credentials;
use super::errors::AuthError;

/// Repository abstraction for credential lookups.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Credentials>, AuthError>;
    /// Every user whose email or name matches, lowest id first.
    async fn find_by_login(&self, identifier: &str) -> Result<Vec<Credentials>, AuthError>;
}

/// Simple in-memory mock repository for tests
pub mod mock {
    use super::*;
    use crate::auth::domain::AuthUser;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockUserRepository {
        users: Mutex<Vec<Credentials>>,
    }

    impl MockUserRepository {
        pub fn insert(&self, name: &str, email: &str, password: &str) -> AuthUser {
            let mut users = self.users.lock().unwrap();
            let user = AuthUser { id: users.len() as i32 + 1, email: email.to_string(), name: name.to_string() };
            users.push(Credentials { user: user.clone(), password: password.to_string() });
            user
        }
    }

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn find_by_email(&self, email: &str) -> Result<Option<Credentials>, AuthError> {
            let users = self.users.lock().unwrap();
            Ok(users.iter().find(|c| c.user.email == email).cloned())
        }

        async fn find_by_login(&self, identifier: &str) -> Result<Vec<Credentials>, AuthError> {
            let users = self.users.lock().unwrap();
            Ok(users
                .iter()
                .filter(|c| c.user.email == identifier || c.user.name == identifier)
                .cloned()
                .collect())
        }
    }
}
