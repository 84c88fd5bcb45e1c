//! User DAO.

use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::{info, instrument, warn};

use models::user::{self, NewUser};

use crate::{errors::ServiceError, RowsAffected};

/// Full replacement of the editable fields. Balances are kept when absent.
#[derive(Clone, Debug, Default)]
pub struct UserReplace {
    pub name: String,
    pub email: String,
    pub password: String,
    pub income: Option<f64>,
    pub account_balance: Option<f64>,
}

/// Create a user; the email must not be registered yet.
#[instrument(skip(db, new), fields(email = %new.email))]
pub async fn create(db: &DatabaseConnection, new: NewUser) -> Result<user::Model, ServiceError> {
    user::validate_email(&new.email)?;
    if get_by_email(db, new.email.trim()).await?.is_some() {
        return Err(ServiceError::Conflict("Email is already taken".into()));
    }
    let created = user::create(db, new).await?;
    info!(id = created.id, "user created");
    Ok(created)
}

pub async fn get_all(db: &DatabaseConnection) -> Result<Vec<user::Model>, ServiceError> {
    user::Entity::find()
        .order_by_asc(user::Column::Id)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn get_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<user::Model>, ServiceError> {
    user::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn get_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<user::Model>, ServiceError> {
    user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Numeric identifiers are tried as an id first; any identifier is then tried as an email.
pub async fn get_by_id_or_email(
    db: &DatabaseConnection,
    identifier: &str,
) -> Result<Option<user::Model>, ServiceError> {
    let identifier = identifier.trim();
    if let Ok(id) = identifier.parse::<i32>() {
        if let Some(found) = get_by_id(db, id).await? {
            return Ok(Some(found));
        }
    }
    get_by_email(db, identifier).await
}

/// Users whose email or name equals `identifier`, lowest id first. Names are not unique.
pub async fn find_by_login(db: &DatabaseConnection, identifier: &str) -> Result<Vec<user::Model>, ServiceError> {
    user::Entity::find()
        .filter(
            Condition::any()
                .add(user::Column::Email.eq(identifier))
                .add(user::Column::Name.eq(identifier)),
        )
        .order_by_asc(user::Column::Id)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Replace the editable fields of user `id`; the new email must not belong to another user.
#[instrument(skip(db, replace), fields(email = %replace.email))]
pub async fn replace(db: &DatabaseConnection, id: i32, replace: UserReplace) -> Result<RowsAffected, ServiceError> {
    user::validate_email(&replace.email)?;
    if let Some(owner) = get_by_email(db, replace.email.trim()).await? {
        if owner.id != id {
            return Err(ServiceError::Conflict("Email is already taken".into()));
        }
    }
    let mut stmt = user::Entity::update_many()
        .col_expr(user::Column::Name, Expr::value(replace.name))
        .col_expr(user::Column::Email, Expr::value(replace.email.trim().to_string()))
        .col_expr(user::Column::Password, Expr::value(replace.password));
    if let Some(v) = replace.income {
        stmt = stmt.col_expr(user::Column::Income, Expr::value(v));
    }
    if let Some(v) = replace.account_balance {
        stmt = stmt.col_expr(user::Column::AccountBalance, Expr::value(v));
    }
    let res = stmt
        .filter(user::Column::Id.eq(id))
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if res.rows_affected == 0 {
        warn!(id, "replace matched no user");
    }
    Ok(res.rows_affected)
}

#[instrument(skip(db))]
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<RowsAffected, ServiceError> {
    let res = user::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if res.rows_affected == 0 {
        warn!(id, "delete matched no user");
    }
    Ok(res.rows_affected)
}
