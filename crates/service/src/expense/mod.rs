//! Expense DAO.
//!
//! Every operation is a single parameterized statement. Update and delete
//! report the affected row count instead of failing when nothing matched.

pub mod month;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use tracing::{info, instrument, warn};

use models::expense::{self, ExpenseType, NewExpense};
use sea_orm::prelude::DateTimeWithTimeZone;

use crate::{errors::ServiceError, RowsAffected};
pub use month::Month;

/// Named optional fields of a partial update. `userid` and `created_at` are
/// not part of it and are never written.
#[derive(Clone, Debug, Default)]
pub struct ExpensePatch {
    pub description: Option<String>,
    pub value_total: Option<f64>,
    pub value_rate: Option<f64>,
    pub credit_start: Option<DateTimeWithTimeZone>,
    pub credit_end: Option<DateTimeWithTimeZone>,
    pub expense_type: Option<ExpenseType>,
    pub due_day: Option<String>,
}

/// Insert a new expense; id and both timestamps are assigned by the store layer.
#[instrument(skip(db, new), fields(user_id = new.user_id, expense_type = new.expense_type.as_str()))]
pub async fn create(db: &DatabaseConnection, new: NewExpense) -> Result<expense::Model, ServiceError> {
    let created = expense::create(db, new).await?;
    info!(id = created.id, "expense created");
    Ok(created)
}

pub async fn get_all(db: &DatabaseConnection) -> Result<Vec<expense::Model>, ServiceError> {
    expense::Entity::find()
        .order_by_asc(expense::Column::Id)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn get_by_user(db: &DatabaseConnection, user_id: i32) -> Result<Vec<expense::Model>, ServiceError> {
    expense::Entity::find()
        .filter(expense::Column::UserId.eq(user_id))
        .order_by_asc(expense::Column::Id)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Absence is `Ok(None)`.
pub async fn get_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<expense::Model>, ServiceError> {
    expense::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Apply the present fields of `patch` to expense `id` and refresh `changed_at`.
#[instrument(skip(db, patch))]
pub async fn update(db: &DatabaseConnection, id: i32, patch: ExpensePatch) -> Result<RowsAffected, ServiceError> {
    if let Some(total) = patch.value_total {
        expense::validate_value_total(total)?;
    }
    let now: DateTimeWithTimeZone = Utc::now().into();
    let mut stmt = expense::Entity::update_many().col_expr(expense::Column::ChangedAt, Expr::value(now));
    if let Some(v) = patch.description {
        stmt = stmt.col_expr(expense::Column::Description, Expr::value(v));
    }
    if let Some(v) = patch.value_total {
        stmt = stmt.col_expr(expense::Column::ValueTotal, Expr::value(v));
    }
    if let Some(v) = patch.value_rate {
        stmt = stmt.col_expr(expense::Column::ValueRate, Expr::value(v));
    }
    if let Some(v) = patch.credit_start {
        stmt = stmt.col_expr(expense::Column::CreditStart, Expr::value(v));
    }
    if let Some(v) = patch.credit_end {
        stmt = stmt.col_expr(expense::Column::CreditEnd, Expr::value(v));
    }
    if let Some(v) = patch.expense_type {
        stmt = stmt.col_expr(expense::Column::ExpenseType, Expr::value(v));
    }
    if let Some(v) = patch.due_day {
        stmt = stmt.col_expr(expense::Column::DueDay, Expr::value(v));
    }
    let res = stmt
        .filter(expense::Column::Id.eq(id))
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if res.rows_affected == 0 {
        warn!(id, "update matched no expense");
    }
    Ok(res.rows_affected)
}

#[instrument(skip(db))]
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<RowsAffected, ServiceError> {
    let res = expense::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if res.rows_affected == 0 {
        warn!(id, "delete matched no expense");
    }
    Ok(res.rows_affected)
}

/// Expenses of `user_id` that are visible in `month` (see [`month`]).
#[instrument(skip(db, month), fields(month = %month))]
pub async fn get_by_user_and_month(
    db: &DatabaseConnection,
    user_id: i32,
    month: &Month,
) -> Result<Vec<expense::Model>, ServiceError> {
    let backend = db.get_database_backend();
    expense::Entity::find()
        .filter(expense::Column::UserId.eq(user_id))
        .filter(month::visible_in_month(backend, month))
        .order_by_asc(expense::Column::Id)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use chrono::{DateTime, FixedOffset, TimeZone};
    use sea_orm::{ActiveModelTrait, Set};

    fn at(y: i32, m: u32, d: u32) -> DateTime<FixedOffset> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap().into()
    }

    type Dates = (
        Option<DateTime<FixedOffset>>,
        Option<DateTime<FixedOffset>>,
        DateTime<FixedOffset>,
        Option<DateTime<FixedOffset>>,
    );

    async fn insert(
        db: &DatabaseConnection,
        description: &str,
        expense_type: ExpenseType,
        user_id: i32,
        dates: Dates,
    ) -> expense::Model {
        let (credit_start, credit_end, created_at, payment_date) = dates;
        expense::ActiveModel {
            description: Set(description.to_string()),
            value_total: Set(100.0),
            value_rate: Set(10.0),
            credit_start: Set(credit_start),
            credit_end: Set(credit_end),
            expense_type: Set(expense_type),
            user_id: Set(user_id),
            created_at: Set(created_at),
            changed_at: Set(created_at),
            due_day: Set("15".into()),
            payment_date: Set(payment_date),
            receipt: Set(None),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("insert expense")
    }

    fn new_expense(user_id: i32, total: f64) -> NewExpense {
        NewExpense {
            description: "Rent".into(),
            value_total: total,
            value_rate: total,
            credit_start: None,
            credit_end: None,
            expense_type: ExpenseType::MonthlyCosts,
            user_id,
            due_day: "1".into(),
            payment_date: None,
        }
    }

    fn descriptions(rows: &[expense::Model]) -> Vec<&str> {
        rows.iter().map(|r| r.description.as_str()).collect()
    }

    #[tokio::test]
    async fn month_rule_selects_each_type_by_its_date() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let jan = at(2024, 1, 10);
        insert(&db, "rent", ExpenseType::MonthlyCosts, 1, (None, None, jan, None)).await;
        let (feb, apr) = (Some(at(2024, 2, 1)), Some(at(2024, 4, 30)));
        insert(&db, "car loan", ExpenseType::Credit, 1, (feb, apr, jan, None)).await;
        let (last_jan, last_dec) = (Some(at(2023, 1, 1)), Some(at(2023, 12, 31)));
        insert(&db, "old loan", ExpenseType::Credit, 1, (last_jan, last_dec, jan, None)).await;
        insert(&db, "groceries", ExpenseType::AllElse, 1, (None, None, at(2024, 3, 5), None)).await;
        insert(&db, "shoes", ExpenseType::AllElse, 1, (None, None, at(2024, 2, 5), None)).await;
        insert(&db, "dentist", ExpenseType::Invoice, 1, (None, None, jan, Some(at(2024, 3, 20)))).await;
        insert(&db, "unpaid", ExpenseType::Invoice, 1, (None, None, at(2024, 3, 1), None)).await;
        insert(&db, "other user", ExpenseType::MonthlyCosts, 2, (None, None, jan, None)).await;

        let march: Month = "2024-03".parse()?;
        let rows = get_by_user_and_month(&db, 1, &march).await?;
        assert_eq!(descriptions(&rows), vec!["rent", "car loan", "groceries", "dentist"]);

        let feb: Month = "2024-02".parse()?;
        let rows = get_by_user_and_month(&db, 1, &feb).await?;
        assert_eq!(descriptions(&rows), vec!["rent", "car loan", "shoes"]);
        Ok(())
    }

    #[tokio::test]
    async fn credit_bounds_are_inclusive_by_month() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let created = at(2024, 1, 1);
        insert(&db, "loan", ExpenseType::Credit, 5, (Some(at(2024, 2, 28)), Some(at(2024, 4, 1)), created, None)).await;
        insert(&db, "open loan", ExpenseType::Credit, 5, (Some(at(2024, 2, 1)), None, created, None)).await;

        for (m, expected) in [("2024-01", 0usize), ("2024-02", 1), ("2024-04", 1), ("2024-05", 0)] {
            let month: Month = m.parse()?;
            let rows = get_by_user_and_month(&db, 5, &month).await?;
            assert_eq!(rows.len(), expected, "month {m}");
        }
        Ok(())
    }

    #[tokio::test]
    async fn create_sets_timestamps_and_rejects_bad_totals() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let created = create(&db, new_expense(3, 1000.0)).await?;
        assert!(created.id > 0);
        assert_eq!(created.created_at, created.changed_at);

        let err = create(&db, new_expense(3, 0.0)).await.unwrap_err();
        assert!(err.is_client_error());
        let err = create(&db, new_expense(0, 10.0)).await.unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(get_all(&db).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn update_writes_only_present_fields() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let original = insert(&db, "phone", ExpenseType::MonthlyCosts, 4, (None, None, at(2024, 1, 1), None)).await;

        let patch = ExpensePatch { value_rate: Some(25.0), due_day: Some("3".into()), ..Default::default() };
        assert_eq!(update(&db, original.id, patch).await?, 1);

        let after = get_by_id(&db, original.id).await?.expect("still present");
        assert_eq!(after.value_rate, 25.0);
        assert_eq!(after.due_day, "3");
        assert_eq!(after.description, "phone");
        assert_eq!(after.value_total, original.value_total);
        assert_eq!(after.user_id, 4);
        assert_eq!(after.created_at, original.created_at);
        assert!(after.changed_at > original.changed_at);
        Ok(())
    }

    #[tokio::test]
    async fn update_rejects_non_positive_total() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let original = insert(&db, "gym", ExpenseType::MonthlyCosts, 4, (None, None, at(2024, 1, 1), None)).await;
        let patch = ExpensePatch { value_total: Some(-1.0), ..Default::default() };
        assert!(update(&db, original.id, patch).await.is_err());
        assert_eq!(get_by_id(&db, original.id).await?.map(|e| e.value_total), Some(100.0));
        Ok(())
    }

    #[tokio::test]
    async fn missing_rows_report_zero_affected() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let patch = ExpensePatch { description: Some("nothing".into()), ..Default::default() };
        assert_eq!(update(&db, 4242, patch).await?, 0);
        assert_eq!(delete(&db, 4242).await?, 0);
        assert!(get_by_id(&db, 4242).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn delete_and_filters_by_user() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let a = create(&db, new_expense(1, 10.0)).await?;
        create(&db, new_expense(2, 20.0)).await?;

        assert_eq!(get_by_user(&db, 1).await?.len(), 1);
        assert_eq!(get_all(&db).await?.len(), 2);
        assert_eq!(delete(&db, a.id).await?, 1);
        assert!(get_by_user(&db, 1).await?.is_empty());
        Ok(())
    }
}
