//! Entity definitions for the relational store.
//! - `expense`: the `haushaltsausgaben` table and its category enum.
//! - `user`: the `users` table.
//! - `db`: connection setup with bounded retry.

pub mod db;
pub mod errors;
pub mod expense;
pub mod user;

#[cfg(test)]
mod tests;
