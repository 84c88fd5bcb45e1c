use std::future::Future;
use std::time::Duration;

use async_graphql::{Context, ErrorExtensions, FieldResult, Object, ID};
use tracing::{debug, warn};

use crate::errors::StoreError;
use crate::filter::{recipes_filter, users_filter, RecipesArgs, UsersArgs};
use crate::schema::GraphQLContext;
use crate::types::{Recipe, User};

pub struct Query;

async fn bounded<T, F>(timeout: Duration, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    tokio::time::timeout(timeout, fut).await.map_err(|_| StoreError::Timeout(timeout))?
}

#[Object]
impl Query {
    /// Users, optionally filtered. An exact `age` overrides `minAge`/`maxAge`.
    async fn users(
        &self,
        ctx: &Context<'_>,
        id: Option<ID>,
        name: Option<String>,
        age: Option<i32>,
        min_age: Option<i32>,
        max_age: Option<i32>,
        eye_color: Option<String>,
    ) -> FieldResult<Vec<User>> {
        let context = ctx.data::<GraphQLContext>()?;
        let args = UsersArgs { id: id.map(|i| i.0), name, age, min_age, max_age, eye_color };
        let Some(filter) = users_filter(&args) else {
            debug!(id = ?args.id, "invalid user id, returning no users");
            return Ok(Vec::new());
        };
        debug!(%filter, "users query");
        match bounded(context.query_timeout, context.store.find_users(filter)).await {
            Ok(docs) => Ok(docs.into_iter().map(User::from).collect()),
            Err(e) => {
                warn!(error = %e, "users query failed");
                Err(e.extend())
            }
        }
    }

    /// Recipes, optionally filtered by id or name.
    async fn recipes(&self, ctx: &Context<'_>, id: Option<ID>, name: Option<String>) -> FieldResult<Vec<Recipe>> {
        let context = ctx.data::<GraphQLContext>()?;
        let args = RecipesArgs { id: id.map(|i| i.0), name };
        let Some(filter) = recipes_filter(&args) else {
            debug!(id = ?args.id, "invalid recipe id, returning no recipes");
            return Ok(Vec::new());
        };
        debug!(%filter, "recipes query");
        match bounded(context.query_timeout, context.store.find_recipes(filter)).await {
            Ok(docs) => Ok(docs.into_iter().map(Recipe::from).collect()),
            Err(e) => {
                warn!(error = %e, "recipes query failed");
                Err(e.extend())
            }
        }
    }
}
