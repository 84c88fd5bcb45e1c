//! Translation of sparse query arguments into conjunctive filter documents.
//!
//! A builder returns `None` when an `id` argument is not a valid ObjectId;
//! callers answer with an empty list instead of an error.

use mongodb::bson::{doc, oid::ObjectId, Document};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct UsersArgs {
    pub id: Option<String>,
    pub name: Option<String>,
    pub age: Option<i32>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub eye_color: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RecipesArgs {
    pub id: Option<String>,
    pub name: Option<String>,
}

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.is_empty())
}

/// Case-insensitive substring match; the text is matched literally.
fn contains_ci(text: &str) -> Document {
    doc! { "$regex": regex::escape(text), "$options": "i" }
}

/// `Some(Ok)` for a valid id, `Some(Err)` for an invalid one.
fn object_id(raw: &Option<String>) -> Option<Result<ObjectId, ()>> {
    non_empty(raw).map(|s| {
        ObjectId::parse_str(s).map_err(|e| {
            debug!(id = %s, error = %e, "invalid ObjectId in filter");
        })
    })
}

pub fn users_filter(args: &UsersArgs) -> Option<Document> {
    let mut filter = Document::new();
    match object_id(&args.id) {
        Some(Ok(oid)) => {
            filter.insert("_id", oid);
        }
        Some(Err(())) => return None,
        None => {}
    }
    if let Some(name) = non_empty(&args.name) {
        filter.insert("username", contains_ci(name));
    }
    if let Some(age) = args.age {
        filter.insert("age", age);
    } else {
        let mut range = Document::new();
        if let Some(min) = args.min_age {
            range.insert("$gte", min);
        }
        if let Some(max) = args.max_age {
            range.insert("$lte", max);
        }
        if !range.is_empty() {
            filter.insert("age", range);
        }
    }
    if let Some(color) = non_empty(&args.eye_color) {
        filter.insert("eye_color", contains_ci(color));
    }
    Some(filter)
}

pub fn recipes_filter(args: &RecipesArgs) -> Option<Document> {
    let mut filter = Document::new();
    match object_id(&args.id) {
        Some(Ok(oid)) => {
            filter.insert("_id", oid);
        }
        Some(Err(())) => return None,
        None => {}
    }
    if let Some(name) = non_empty(&args.name) {
        filter.insert("name", contains_ci(name));
    }
    Some(filter)
}
