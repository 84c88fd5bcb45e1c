use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use models::user::{self, NewUser};
use service::user::UserReplace;

use crate::{errors::ApiError, routes::expenses::WriteOutcome, state::AppState};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateUserInput {
    #[serde(default)]
    pub name: String,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(default)]
    pub income: f64,
    #[serde(default)]
    pub accountbalance: f64,
}

/// Replaces name, email and password; balances are kept when omitted.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ReplaceUserInput {
    #[serde(default)]
    pub name: String,
    pub email: Option<String>,
    pub password: Option<String>,
    pub income: Option<f64>,
    pub accountbalance: Option<f64>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AuthenticateInput {
    /// Email or user name
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthOutput {
    pub message: String,
    pub user_id: i32,
    pub name: String,
}

fn required(field: Option<String>, name: &str) -> Result<String, ApiError> {
    match field {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::bad_request(format!("{name} is required"))),
    }
}

fn parse_user_id(raw: &str) -> Result<i32, ApiError> {
    raw.trim().parse::<i32>().map_err(|_| ApiError::bad_request("Invalid user ID"))
}

#[utoipa::path(
    post, path = "/users/", tag = "users",
    request_body = CreateUserInput,
    responses(
        (status = 201, description = "Created", body = crate::openapi::UserDoc),
        (status = 400, description = "Email taken or fields missing", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserInput>, JsonRejection>,
) -> Result<(StatusCode, Json<user::Model>), ApiError> {
    let Json(input) = payload?;
    let email = required(input.email, "email")?;
    let password = state.auth.hash_password(&required(input.password, "password")?)?;
    let created = service::user::create(
        &state.db,
        NewUser {
            name: input.name,
            email,
            password,
            income: input.income,
            account_balance: input.accountbalance,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/users/", tag = "users",
    responses((status = 200, description = "List OK", body = [crate::openapi::UserDoc]))
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<user::Model>>, ApiError> {
    Ok(Json(service::user::get_all(&state.db).await?))
}

#[utoipa::path(
    get, path = "/users/{identifier}", tag = "users",
    params(("identifier" = String, Path, description = "User ID or email")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::UserDoc),
        (status = 404, description = "User not found", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn get_one(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<Json<user::Model>, ApiError> {
    service::user::get_by_id_or_email(&state.db, &identifier)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("User not found"))
}

#[utoipa::path(
    put, path = "/users/{id}", tag = "users",
    params(("id" = i32, Path, description = "User ID")),
    request_body = ReplaceUserInput,
    responses(
        (status = 200, description = "Updated (rows_affected may be 0)", body = WriteOutcome),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn replace(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ReplaceUserInput>, JsonRejection>,
) -> Result<Json<WriteOutcome>, ApiError> {
    let Json(input) = payload?;
    let id = parse_user_id(&id)?;
    let email = required(input.email, "email")?;
    let password = state.auth.hash_password(&required(input.password, "password")?)?;
    let rows_affected = service::user::replace(
        &state.db,
        id,
        UserReplace {
            name: input.name,
            email,
            password,
            income: input.income,
            account_balance: input.accountbalance,
        },
    )
    .await?;
    Ok(Json(WriteOutcome { message: "User updated successfully".into(), rows_affected }))
}

#[utoipa::path(
    delete, path = "/users/{id}", tag = "users",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Deleted (rows_affected may be 0)", body = WriteOutcome),
        (status = 400, description = "Invalid user ID", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WriteOutcome>, ApiError> {
    let id = parse_user_id(&id)?;
    let rows_affected = service::user::delete(&state.db, id).await?;
    Ok(Json(WriteOutcome { message: "User deleted successfully".into(), rows_affected }))
}

#[utoipa::path(
    post, path = "/users/login", tag = "users",
    request_body = LoginInput,
    responses(
        (status = 200, description = "Login successful", body = AuthOutput),
        (status = 401, description = "Invalid credentials", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginInput>, JsonRejection>,
) -> Result<Json<AuthOutput>, ApiError> {
    let Json(input) = payload.map_err(|_| ApiError::bad_request("Invalid input"))?;
    let user = state.auth.login(&input.email, &input.password).await?;
    info!(user_id = user.id, "login successful");
    Ok(Json(AuthOutput { message: "Login successful".into(), user_id: user.id, name: user.name }))
}

#[utoipa::path(
    post, path = "/users/authenticate", tag = "users",
    request_body = AuthenticateInput,
    responses(
        (status = 200, description = "Authentication successful", body = AuthOutput),
        (status = 401, description = "Invalid credentials", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn authenticate(
    State(state): State<AppState>,
    payload: Result<Json<AuthenticateInput>, JsonRejection>,
) -> Result<Json<AuthOutput>, ApiError> {
    let Json(input) = payload.map_err(|_| ApiError::bad_request("Invalid input"))?;
    let user = state.auth.authenticate(&input.identifier, &input.password).await?;
    Ok(Json(AuthOutput { message: "Authentication successful".into(), user_id: user.id, name: user.name }))
}
