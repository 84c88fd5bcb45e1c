use std::sync::Arc;
use std::time::Duration;

use async_graphql::{EmptyMutation, EmptySubscription, Schema};

use crate::resolvers::Query;
use crate::store::DocumentStore;

/// Shared state available to every resolver.
pub struct GraphQLContext {
    pub store: Arc<dyn DocumentStore>,
    pub query_timeout: Duration,
}

pub type GraphQLSchema = Schema<Query, EmptyMutation, EmptySubscription>;

pub fn create_schema(store: Arc<dyn DocumentStore>, query_timeout: Duration) -> GraphQLSchema {
    Schema::build(Query, EmptyMutation, EmptySubscription)
        .data(GraphQLContext { store, query_timeout })
        .finish()
}
