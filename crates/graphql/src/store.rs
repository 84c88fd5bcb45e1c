use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::Document, Collection, Database};
use tracing::instrument;

use crate::documents::{RecipeDocument, UserDocument};
use crate::errors::StoreError;

/// Read access to the user and recipe collections.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_users(&self, filter: Document) -> Result<Vec<UserDocument>, StoreError>;
    async fn find_recipes(&self, filter: Document) -> Result<Vec<RecipeDocument>, StoreError>;
}

#[derive(Clone)]
pub struct MongoStore {
    users: Collection<UserDocument>,
    recipes: Collection<RecipeDocument>,
}

impl MongoStore {
    pub fn new(db: &Database, users_collection: &str, recipes_collection: &str) -> Self {
        Self {
            users: db.collection(users_collection),
            recipes: db.collection(recipes_collection),
        }
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    #[instrument(skip(self), fields(collection = %self.users.name()))]
    async fn find_users(&self, filter: Document) -> Result<Vec<UserDocument>, StoreError> {
        let cursor = self.users.find(filter, None).await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self), fields(collection = %self.recipes.name()))]
    async fn find_recipes(&self, filter: Document) -> Result<Vec<RecipeDocument>, StoreError> {
        let cursor = self.recipes.find(filter, None).await?;
        Ok(cursor.try_collect().await?)
    }
}
