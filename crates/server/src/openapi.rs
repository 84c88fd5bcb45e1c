use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

use crate::routes::expenses::{CreateExpenseInput, UpdateExpenseInput, WriteOutcome};
use crate::routes::users::{AuthOutput, AuthenticateInput, CreateUserInput, LoginInput, ReplaceUserInput};

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ErrorResponse { pub error: String }

/// Wire shape of an expense record.
#[derive(Serialize, ToSchema)]
pub struct ExpenseDoc {
    pub id: i32,
    pub description: String,
    pub valuetotal: f64,
    pub valuerate: f64,
    pub creditstart: Option<String>,
    pub creditend: Option<String>,
    /// monthlycosts | credit | allelse | invoice
    #[serde(rename = "type")]
    pub expense_type: String,
    pub userid: i32,
    pub created_at: String,
    pub changed_at: String,
    pub faelligkeitstag: String,
    pub zahldatum: Option<String>,
}

/// Wire shape of a user record; the password is never returned.
#[derive(ToSchema)]
pub struct UserDoc {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub income: f64,
    pub accountbalance: f64,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::expenses::create,
        crate::routes::expenses::list,
        crate::routes::expenses::get_one,
        crate::routes::expenses::update,
        crate::routes::expenses::delete,
        crate::routes::expenses::by_user_and_month,
        crate::routes::users::create,
        crate::routes::users::list,
        crate::routes::users::get_one,
        crate::routes::users::replace,
        crate::routes::users::delete,
        crate::routes::users::login,
        crate::routes::users::authenticate,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorResponse,
            ExpenseDoc,
            UserDoc,
            CreateExpenseInput,
            UpdateExpenseInput,
            WriteOutcome,
            CreateUserInput,
            ReplaceUserInput,
            LoginInput,
            AuthenticateInput,
            AuthOutput,
        )
    ),
    tags(
        (name = "health"),
        (name = "expenses"),
        (name = "users")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        let expected = [
            "/health",
            "/haushaltsausgaben/",
            "/haushaltsausgaben/{id}",
            "/haushaltsausgaben/{userid}/{month}",
            "/users/login",
        ];
        for p in expected {
            assert!(paths.iter().any(|k| k.as_str() == p), "missing {p}");
        }
    }
}
