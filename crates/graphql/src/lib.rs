//! Read-only GraphQL API over the user and recipe document collections.

pub mod client;
pub mod documents;
pub mod errors;
pub mod filter;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod resolvers;
pub mod schema;
pub mod startup;
pub mod store;
pub mod types;

pub use schema::{create_schema, GraphQLContext, GraphQLSchema};
pub use startup::run;
