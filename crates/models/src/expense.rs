//! Household expense ("Haushaltsausgaben") entity.
//!
//! Column names follow the existing `haushaltsausgaben` table; the JSON wire
//! names are the same lowercase column names.

use std::str::FromStr;

use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Expense category. Decides which date field makes the record visible in a month.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum ExpenseType {
    /// Recurring every month.
    #[sea_orm(string_value = "monthlycosts")]
    MonthlyCosts,
    /// Runs between `creditstart` and `creditend`.
    #[sea_orm(string_value = "credit")]
    Credit,
    /// One-off, booked in the month it was created.
    #[sea_orm(string_value = "allelse")]
    AllElse,
    /// Booked in the month of its `zahldatum`.
    #[sea_orm(string_value = "invoice")]
    Invoice,
}

impl ExpenseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseType::MonthlyCosts => "monthlycosts",
            ExpenseType::Credit => "credit",
            ExpenseType::AllElse => "allelse",
            ExpenseType::Invoice => "invoice",
        }
    }
}

impl FromStr for ExpenseType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthlycosts" => Ok(ExpenseType::MonthlyCosts),
            "credit" => Ok(ExpenseType::Credit),
            "allelse" => Ok(ExpenseType::AllElse),
            "invoice" => Ok(ExpenseType::Invoice),
            "" => Err(ModelError::Validation("missing expense type".into())),
            other => Err(ModelError::Validation(format!(
                "invalid expense type '{other}', expected one of monthlycosts, credit, allelse, invoice"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "haushaltsausgaben")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_name = "valuetotal")]
    #[serde(rename = "valuetotal")]
    pub value_total: f64,
    #[sea_orm(column_name = "valuerate")]
    #[serde(rename = "valuerate")]
    pub value_rate: f64,
    #[sea_orm(column_name = "creditstart", nullable)]
    #[serde(rename = "creditstart")]
    pub credit_start: Option<DateTimeWithTimeZone>,
    #[sea_orm(column_name = "creditend", nullable)]
    #[serde(rename = "creditend")]
    pub credit_end: Option<DateTimeWithTimeZone>,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub expense_type: ExpenseType,
    #[sea_orm(column_name = "userid", indexed)]
    #[serde(rename = "userid")]
    pub user_id: i32,
    pub created_at: DateTimeWithTimeZone,
    pub changed_at: DateTimeWithTimeZone,
    #[sea_orm(column_name = "faelligkeitstag")]
    #[serde(rename = "faelligkeitstag")]
    pub due_day: String,
    #[sea_orm(column_name = "zahldatum", nullable)]
    #[serde(rename = "zahldatum")]
    pub payment_date: Option<DateTimeWithTimeZone>,
    #[sea_orm(nullable)]
    #[serde(skip)]
    pub receipt: Option<Vec<u8>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Fields accepted at creation; id and timestamps are assigned here.
#[derive(Clone, Debug)]
pub struct NewExpense {
    pub description: String,
    pub value_total: f64,
    pub value_rate: f64,
    pub credit_start: Option<DateTimeWithTimeZone>,
    pub credit_end: Option<DateTimeWithTimeZone>,
    pub expense_type: ExpenseType,
    pub user_id: i32,
    pub due_day: String,
    pub payment_date: Option<DateTimeWithTimeZone>,
}

pub fn validate_value_total(value: f64) -> Result<(), ModelError> {
    // NaN fails this comparison as well
    if !(value > 0.0) {
        return Err(ModelError::Validation("invalid valuetotal, must be positive".into()));
    }
    Ok(())
}

pub fn validate_user_id(user_id: i32) -> Result<(), ModelError> {
    if user_id <= 0 {
        return Err(ModelError::Validation("invalid or missing userid".into()));
    }
    Ok(())
}

pub async fn create(db: &DatabaseConnection, new: NewExpense) -> Result<Model, ModelError> {
    validate_value_total(new.value_total)?;
    validate_user_id(new.user_id)?;
    let now: DateTimeWithTimeZone = Utc::now().into();
    let am = ActiveModel {
        description: Set(new.description),
        value_total: Set(new.value_total),
        value_rate: Set(new.value_rate),
        credit_start: Set(new.credit_start),
        credit_end: Set(new.credit_end),
        expense_type: Set(new.expense_type),
        user_id: Set(new.user_id),
        created_at: Set(now),
        changed_at: Set(now),
        due_day: Set(new.due_day),
        payment_date: Set(new.payment_date),
        receipt: Set(None),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expense_type_parses_case_insensitively() {
        assert_eq!("Credit".parse::<ExpenseType>().unwrap(), ExpenseType::Credit);
        assert_eq!(" monthlycosts ".parse::<ExpenseType>().unwrap(), ExpenseType::MonthlyCosts);
        assert!("weekly".parse::<ExpenseType>().is_err());
        assert!("".parse::<ExpenseType>().is_err());
    }

    #[test]
    fn expense_type_wire_names_match_column_values() {
        for t in [ExpenseType::MonthlyCosts, ExpenseType::Credit, ExpenseType::AllElse, ExpenseType::Invoice] {
            let json = serde_json::to_value(t).unwrap();
            assert_eq!(json, serde_json::Value::String(t.as_str().to_string()));
            assert_eq!(t.to_value(), t.as_str());
        }
    }

    #[test]
    fn value_total_must_be_positive() {
        assert!(validate_value_total(1000.0).is_ok());
        assert!(validate_value_total(0.0).is_err());
        assert!(validate_value_total(-3.5).is_err());
        assert!(validate_value_total(f64::NAN).is_err());
    }

    #[test]
    fn user_id_must_be_positive() {
        assert!(validate_user_id(7).is_ok());
        assert!(validate_user_id(0).is_err());
    }
}
