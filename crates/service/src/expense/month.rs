//! Month visibility rule.
//!
//! An expense is listed for a month when any of these holds:
//! - it is `monthlycosts`,
//! - it is `credit` and the month lies within `creditstart..=creditend`,
//! - it is `allelse` and was created in that month,
//! - it is `invoice` and its `zahldatum` falls in that month.
//!
//! Months are compared as "YYYY-MM" strings projected from the columns, so
//! the comparison is lexicographic and NULL dates never match.

use std::fmt;
use std::str::FromStr;

use models::expense::{Column, ExpenseType};
use sea_orm::sea_query::{Alias, Expr, Func, SimpleExpr};
use sea_orm::{ColumnTrait, Condition, DbBackend};

use crate::errors::ServiceError;

/// A validated calendar month in "YYYY-MM" form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Month(String);

impl Month {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Month {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || ServiceError::Validation(format!("invalid month '{s}', expected YYYY-MM"));
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let m: u8 = month.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&m) {
            return Err(invalid());
        }
        Ok(Month(s.to_string()))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// "YYYY-MM" projection of a date column for the given backend.
fn year_month(backend: DbBackend, col: Column) -> SimpleExpr {
    match backend {
        DbBackend::Postgres => Func::cust(Alias::new("TO_CHAR"))
            .arg(Expr::col(col).cast_as(Alias::new("date")))
            .arg("YYYY-MM")
            .into(),
        DbBackend::MySql => Func::cust(Alias::new("DATE_FORMAT"))
            .arg(Expr::col(col))
            .arg("%Y-%m")
            .into(),
        // stored as ISO-8601 text
        DbBackend::Sqlite => Func::cust(Alias::new("SUBSTR"))
            .arg(Expr::col(col))
            .arg(1)
            .arg(7)
            .into(),
    }
}

/// Disjunction of the four per-type rules for `month`.
pub fn visible_in_month(backend: DbBackend, month: &Month) -> Condition {
    let m = month.as_str();
    Condition::any()
        .add(Column::ExpenseType.eq(ExpenseType::MonthlyCosts))
        .add(
            Condition::all()
                .add(Column::ExpenseType.eq(ExpenseType::Credit))
                .add(Expr::expr(year_month(backend, Column::CreditStart)).lte(m))
                .add(Expr::expr(year_month(backend, Column::CreditEnd)).gte(m)),
        )
        .add(
            Condition::all()
                .add(Column::ExpenseType.eq(ExpenseType::AllElse))
                .add(Expr::expr(year_month(backend, Column::CreatedAt)).eq(m)),
        )
        .add(
            Condition::all()
                .add(Column::ExpenseType.eq(ExpenseType::Invoice))
                .add(Expr::expr(year_month(backend, Column::PaymentDate)).eq(m)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::expense::Entity;
    use sea_orm::{EntityTrait, QueryFilter, QueryTrait};

    #[test]
    fn month_accepts_year_dash_month() {
        assert_eq!("2024-03".parse::<Month>().unwrap().as_str(), "2024-03");
        assert_eq!(" 2024-12 ".parse::<Month>().unwrap().to_string(), "2024-12");
    }

    #[test]
    fn month_rejects_malformed_input() {
        for bad in ["2024-13", "2024-00", "2024-3", "24-03", "2024/03", "2024-03-01", "abcd-ef", ""] {
            let err = bad.parse::<Month>().unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)), "{bad} should be rejected");
        }
    }

    #[test]
    fn postgres_condition_projects_dates_with_to_char() {
        let month: Month = "2024-03".parse().unwrap();
        let sql = Entity::find()
            .filter(visible_in_month(DbBackend::Postgres, &month))
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#"TO_CHAR(CAST("creditstart" AS date), 'YYYY-MM') <= '2024-03'"#), "{sql}");
        assert!(sql.contains(r#"TO_CHAR(CAST("creditend" AS date), 'YYYY-MM') >= '2024-03'"#), "{sql}");
        assert!(sql.contains(r#"TO_CHAR(CAST("created_at" AS date), 'YYYY-MM') = '2024-03'"#), "{sql}");
        assert!(sql.contains(r#"TO_CHAR(CAST("zahldatum" AS date), 'YYYY-MM') = '2024-03'"#), "{sql}");
        assert!(sql.contains("'monthlycosts'"), "{sql}");
        assert!(sql.contains(" OR "), "{sql}");
    }

    #[test]
    fn sqlite_condition_uses_substr() {
        let month: Month = "2023-11".parse().unwrap();
        let sql = Entity::find()
            .filter(visible_in_month(DbBackend::Sqlite, &month))
            .build(DbBackend::Sqlite)
            .to_string();

        assert!(sql.contains(r#"SUBSTR("zahldatum", 1, 7) = '2023-11'"#), "{sql}");
        assert!(!sql.contains("TO_CHAR"), "{sql}");
    }
}
