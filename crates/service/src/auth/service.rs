use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::domain::{AuthUser, Credentials};
use super::errors::AuthError;
use super::password::PasswordScheme;
use super::repository::UserRepository;

/// Auth business service independent of web framework
pub struct AuthService<R: UserRepository> {
    repo: Arc<R>,
    scheme: Arc<dyn PasswordScheme>,
}

impl<R: UserRepository> Clone for AuthService<R> {
    fn clone(&self) -> Self {
        Self { repo: self.repo.clone(), scheme: self.scheme.clone() }
    }
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, scheme: Arc<dyn PasswordScheme>) -> Self { Self { repo, scheme } }

    /// Stored form of a new password under the active scheme.
    pub fn hash_password(&self, raw: &str) -> Result<String, AuthError> {
        if raw.is_empty() {
            return Err(AuthError::Validation("password required".into()));
        }
        Ok(self.scheme.hash(raw))
    }

    /// Check email and password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, Plaintext, repository::mock::MockUserRepository};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockUserRepository::default());
    /// repo.insert("anna", "anna@example.org", "pw");
    /// let svc = AuthService::new(repo, Arc::new(Plaintext));
    /// let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
    /// let user = rt.block_on(svc.login("anna@example.org", "pw")).unwrap();
    /// assert_eq!(user.name, "anna");
    /// ```
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let creds = self.repo.find_by_email(email).await?;
        self.check(creds, password)
    }

    /// Check an email or user name and the password. Names may be shared, so
    /// the first candidate whose password verifies wins.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, identifier: &str, password: &str) -> Result<AuthUser, AuthError> {
        let candidates = self.repo.find_by_login(identifier).await?;
        let matched = candidates.into_iter().find(|c| self.scheme.verify(password, &c.password));
        match matched {
            Some(creds) => {
                info!(user_id = creds.user.id, "user authenticated");
                Ok(creds.user)
            }
            None => {
                debug!("no candidate with a matching password");
                Err(AuthError::Unauthorized)
            }
        }
    }

    fn check(&self, creds: Option<Credentials>, password: &str) -> Result<AuthUser, AuthError> {
        let Some(creds) = creds else {
            debug!("no matching user");
            return Err(AuthError::Unauthorized);
        };
        if !self.scheme.verify(password, &creds.password) {
            debug!(user_id = creds.user.id, "password mismatch");
            return Err(AuthError::Unauthorized);
        }
        info!(user_id = creds.user.id, "user authenticated");
        Ok(creds.user)
    }
}
