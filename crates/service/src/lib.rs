//! Service layer: data-access operations on top of the `models` entities.
//! - `expense`: expense DAO, including the month visibility rule.
//! - `user`: user DAO.
//! - `auth`: credential checks behind a repository and a password scheme.

pub mod auth;
pub mod errors;
pub mod expense;
pub mod user;
#[cfg(test)]
pub mod test_support;

/// Number of rows touched by an update or delete. Zero is a valid outcome.
pub type RowsAffected = u64;
