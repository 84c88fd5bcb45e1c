//! Shared building blocks for both services: logging setup, environment
//! helpers and small wire types.

pub mod env;
pub mod types;
pub mod utils;
