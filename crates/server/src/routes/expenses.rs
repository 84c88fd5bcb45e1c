use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tracing::info;

use models::expense::{self, ExpenseType, NewExpense};
use service::expense::{ExpensePatch, Month};

use crate::{errors::ApiError, state::AppState};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Restrict to one user; absent or non-positive lists everything
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateExpenseInput {
    #[serde(default)]
    pub description: String,
    pub valuetotal: Option<f64>,
    #[serde(default)]
    pub valuerate: f64,
    pub creditstart: Option<DateTime<FixedOffset>>,
    pub creditend: Option<DateTime<FixedOffset>>,
    #[serde(rename = "type")]
    pub expense_type: Option<String>,
    #[serde(alias = "user_id")]
    pub userid: Option<i32>,
    #[serde(default)]
    pub faelligkeitstag: String,
    pub zahldatum: Option<DateTime<FixedOffset>>,
}

/// Partial update; `userid` and `created_at` are ignored when sent.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct UpdateExpenseInput {
    pub description: Option<String>,
    pub valuetotal: Option<f64>,
    pub valuerate: Option<f64>,
    pub creditstart: Option<DateTime<FixedOffset>>,
    pub creditend: Option<DateTime<FixedOffset>>,
    #[serde(rename = "type")]
    pub expense_type: Option<String>,
    pub faelligkeitstag: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct WriteOutcome {
    pub message: String,
    pub rows_affected: u64,
}

fn parse_id(raw: &str, what: &str) -> Result<i32, ApiError> {
    raw.trim().parse::<i32>().map_err(|_| ApiError::bad_request(format!("Invalid {what} ID")))
}

impl CreateExpenseInput {
    fn into_new_expense(self) -> Result<NewExpense, ApiError> {
        let value_total = self.valuetotal.unwrap_or(0.0);
        expense::validate_value_total(value_total)
            .map_err(|_| ApiError::bad_request("Invalid valuetotal, must be positive"))?;
        let user_id = self.userid.unwrap_or(0);
        expense::validate_user_id(user_id)
            .map_err(|_| ApiError::bad_request("Invalid or missing userid"))?;
        let raw_type = self.expense_type.unwrap_or_default();
        if raw_type.trim().is_empty() {
            return Err(ApiError::bad_request("Missing expense type"));
        }
        let expense_type: ExpenseType = raw_type
            .parse()
            .map_err(|e: models::errors::ModelError| ApiError::bad_request(e.to_string()))?;
        Ok(NewExpense {
            description: self.description,
            value_total,
            value_rate: self.valuerate,
            credit_start: self.creditstart,
            credit_end: self.creditend,
            expense_type,
            user_id,
            due_day: self.faelligkeitstag,
            payment_date: self.zahldatum,
        })
    }
}

impl UpdateExpenseInput {
    fn into_patch(self) -> Result<ExpensePatch, ApiError> {
        let expense_type = match self.expense_type.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<ExpenseType>()
                    .map_err(|e| ApiError::bad_request(e.to_string()))?,
            ),
        };
        Ok(ExpensePatch {
            description: self.description,
            value_total: self.valuetotal,
            value_rate: self.valuerate,
            credit_start: self.creditstart,
            credit_end: self.creditend,
            expense_type,
            due_day: self.faelligkeitstag,
        })
    }
}

#[utoipa::path(
    post, path = "/haushaltsausgaben/", tag = "expenses",
    request_body = CreateExpenseInput,
    responses(
        (status = 201, description = "Created", body = crate::openapi::ExpenseDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorResponse),
        (status = 500, description = "Create Failed", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateExpenseInput>, JsonRejection>,
) -> Result<(StatusCode, Json<expense::Model>), ApiError> {
    let Json(input) = payload?;
    let new = input.into_new_expense()?;
    info!(
        user_id = new.user_id,
        expense_type = new.expense_type.as_str(),
        value_total = new.value_total,
        "create expense request"
    );
    let created = service::expense::create(&state.db, new).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/haushaltsausgaben/", tag = "expenses",
    params(ListQuery),
    responses(
        (status = 200, description = "List OK", body = [crate::openapi::ExpenseDoc]),
        (status = 400, description = "Invalid user_id", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn list(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<expense::Model>>, ApiError> {
    let user_id = match q.user_id.as_deref().map(str::trim) {
        None | Some("") => 0,
        Some(raw) => raw.parse::<i32>().map_err(|_| ApiError::bad_request("Invalid user_id"))?,
    };
    let rows = if user_id > 0 {
        service::expense::get_by_user(&state.db, user_id).await?
    } else {
        service::expense::get_all(&state.db).await?
    };
    Ok(Json(rows))
}

#[utoipa::path(
    get, path = "/haushaltsausgaben/{id}", tag = "expenses",
    params(("id" = i32, Path, description = "Expense ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::ExpenseDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<expense::Model>, ApiError> {
    let id = parse_id(&id, "expense")?;
    service::expense::get_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Expense not found"))
}

#[utoipa::path(
    put, path = "/haushaltsausgaben/{id}", tag = "expenses",
    params(("id" = i32, Path, description = "Expense ID")),
    request_body = UpdateExpenseInput,
    responses(
        (status = 200, description = "Updated (rows_affected may be 0)", body = WriteOutcome),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateExpenseInput>, JsonRejection>,
) -> Result<Json<WriteOutcome>, ApiError> {
    let Json(input) = payload?;
    let id = parse_id(&id, "expense")?;
    let rows_affected = service::expense::update(&state.db, id, input.into_patch()?).await?;
    Ok(Json(WriteOutcome { message: "Expense updated successfully".into(), rows_affected }))
}

#[utoipa::path(
    delete, path = "/haushaltsausgaben/{id}", tag = "expenses",
    params(("id" = i32, Path, description = "Expense ID")),
    responses(
        (status = 200, description = "Deleted (rows_affected may be 0)", body = WriteOutcome),
        (status = 400, description = "Invalid ID", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WriteOutcome>, ApiError> {
    let id = parse_id(&id, "expense")?;
    let rows_affected = service::expense::delete(&state.db, id).await?;
    Ok(Json(WriteOutcome { message: "Expense deleted successfully".into(), rows_affected }))
}

#[utoipa::path(
    get, path = "/haushaltsausgaben/{userid}/{month}", tag = "expenses",
    params(
        ("userid" = i32, Path, description = "User ID"),
        ("month" = String, Path, description = "Month as YYYY-MM")
    ),
    responses(
        (status = 200, description = "Expenses visible in the month", body = [crate::openapi::ExpenseDoc]),
        (status = 400, description = "Invalid user ID or month", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn by_user_and_month(
    State(state): State<AppState>,
    Path((user_id, month)): Path<(String, String)>,
) -> Result<Json<Vec<expense::Model>>, ApiError> {
    let user_id = parse_id(&user_id, "user")?;
    let month: Month = month.parse()?;
    let rows = service::expense::get_by_user_and_month(&state.db, user_id, &month).await?;
    Ok(Json(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(json: serde_json::Value) -> CreateExpenseInput {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn create_input_accepts_user_id_alias() {
        let new = input(serde_json::json!({
            "description": "Rent", "valuetotal": 1000.0, "type": "monthlycosts", "user_id": 7
        }))
        .into_new_expense()
        .unwrap();
        assert_eq!(new.user_id, 7);
        assert_eq!(new.expense_type, ExpenseType::MonthlyCosts);
    }

    fn rejection(json: serde_json::Value) -> ApiError {
        input(json).into_new_expense().unwrap_err()
    }

    #[test]
    fn create_input_rejections_carry_messages() {
        let err = rejection(serde_json::json!({"valuetotal": 0, "type": "credit", "userid": 1}));
        assert_eq!(err.message, "Invalid valuetotal, must be positive");
        let err = rejection(serde_json::json!({"valuetotal": 5, "type": "credit"}));
        assert_eq!(err.message, "Invalid or missing userid");
        let err = rejection(serde_json::json!({"valuetotal": 5, "userid": 1}));
        assert_eq!(err.message, "Missing expense type");
        let err = rejection(serde_json::json!({"valuetotal": 5, "userid": 1, "type": "weekly"}));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn update_input_ignores_blank_type() {
        let typed = |t: &str| UpdateExpenseInput { expense_type: Some(t.into()), ..Default::default() };
        assert!(typed(" ").into_patch().unwrap().expense_type.is_none());
        assert!(typed("nope").into_patch().is_err());
    }
}
