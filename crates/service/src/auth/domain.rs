use serde::{Deserialize, Serialize};

/// Domain user (business view)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i32,
    pub email: String,
    pub name: String,
}

/// A user together with the stored password
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user: AuthUser,
    pub password: String,
}

impl From<models::user::Model> for Credentials {
    fn from(u: models::user::Model) -> Self {
        Credentials {
            user: AuthUser { id: u.id, email: u.email, name: u.name },
            password: u.password,
        }
    }
}
