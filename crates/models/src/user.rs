use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(indexed)]
    pub email: String,
    /// Stored as given; the active `PasswordScheme` decides the format.
    #[serde(skip_serializing, default)]
    pub password: String,
    pub income: f64,
    #[sea_orm(column_name = "accountbalance")]
    #[serde(rename = "accountbalance")]
    pub account_balance: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Default)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub income: f64,
    pub account_balance: f64,
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ModelError::Validation("email required".into()));
    }
    if !email.contains('@') {
        return Err(ModelError::Validation("invalid email".into()));
    }
    Ok(())
}

pub async fn create(db: &DatabaseConnection, new: NewUser) -> Result<Model, ModelError> {
    validate_email(&new.email)?;
    if new.password.is_empty() {
        return Err(ModelError::Validation("password required".into()));
    }
    let am = ActiveModel {
        name: Set(new.name),
        email: Set(new.email.trim().to_string()),
        password: Set(new.password),
        income: Set(new.income),
        account_balance: Set(new.account_balance),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}
