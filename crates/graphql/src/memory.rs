//! In-process test double that evaluates the same filter documents as MongoDB.
//!
//! Supports the subset the filter builders emit: field equality, `$eq`,
//! `$gte`, `$lte` and `$regex` with `$options: "i"`.

use async_trait::async_trait;
use mongodb::bson::{self, Bson, Document};
use regex::RegexBuilder;
use serde::de::DeserializeOwned;

use crate::documents::{RecipeDocument, UserDocument};
use crate::errors::StoreError;
use crate::store::DocumentStore;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    users: Vec<Document>,
    recipes: Vec<Document>,
}

impl MemoryStore {
    pub fn new(users: Vec<Document>, recipes: Vec<Document>) -> Self {
        Self { users, recipes }
    }
}

fn as_number(v: &Bson) -> Option<f64> {
    match v {
        Bson::Int32(n) => Some(f64::from(*n)),
        Bson::Int64(n) => Some(*n as f64),
        Bson::Double(n) => Some(*n),
        _ => None,
    }
}

fn values_equal(a: &Bson, b: &Bson) -> bool {
    match (as_number(a), as_number(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn compare(field: Option<&Bson>, bound: &Bson, ok: fn(f64, f64) -> bool) -> bool {
    match (field.and_then(as_number), as_number(bound)) {
        (Some(x), Some(y)) => ok(x, y),
        _ => false,
    }
}

fn matches_regex(field: Option<&Bson>, pattern: &Bson, options: Option<&Bson>) -> Result<bool, StoreError> {
    let (Some(Bson::String(text)), Bson::String(pattern)) = (field, pattern) else {
        return Ok(false);
    };
    let case_insensitive = matches!(options, Some(Bson::String(o)) if o.contains('i'));
    let re = RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|e| StoreError::Driver(format!("invalid $regex: {e}")))?;
    Ok(re.is_match(text))
}

fn matches_condition(field: Option<&Bson>, cond: &Bson) -> Result<bool, StoreError> {
    let ops = match cond {
        Bson::Document(d) if d.keys().next().is_some_and(|k| k.starts_with('$')) => d,
        other => return Ok(field.is_some_and(|v| values_equal(v, other))),
    };
    for (op, arg) in ops {
        let ok = match op.as_str() {
            "$eq" => field.is_some_and(|v| values_equal(v, arg)),
            "$gte" => compare(field, arg, |x, y| x >= y),
            "$lte" => compare(field, arg, |x, y| x <= y),
            "$regex" => matches_regex(field, arg, ops.get("$options"))?,
            "$options" => true,
            other => return Err(StoreError::Driver(format!("unsupported operator {other}"))),
        };
        if !ok {
            return Ok(false);
        }
    }
    Ok(true)
}

/// True when every top-level condition holds for `doc`.
pub fn matches(doc: &Document, filter: &Document) -> Result<bool, StoreError> {
    for (key, cond) in filter {
        if !matches_condition(doc.get(key), cond)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn select<T: DeserializeOwned>(docs: &[Document], filter: &Document) -> Result<Vec<T>, StoreError> {
    let mut out = Vec::new();
    for doc in docs {
        if matches(doc, filter)? {
            out.push(bson::from_document(doc.clone()).map_err(|e| StoreError::Decode(e.to_string()))?);
        }
    }
    Ok(out)
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_users(&self, filter: Document) -> Result<Vec<UserDocument>, StoreError> {
        select(&self.users, &filter)
    }

    async fn find_recipes(&self, filter: Document) -> Result<Vec<RecipeDocument>, StoreError> {
        select(&self.recipes, &filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn range_and_equality_coerce_numbers() {
        let d = doc! { "age": 25_i64 };
        assert!(matches(&d, &doc! { "age": { "$gte": 20, "$lte": 30 } }).unwrap());
        assert!(matches(&d, &doc! { "age": 25 }).unwrap());
        assert!(!matches(&d, &doc! { "age": { "$gte": 26 } }).unwrap());
        assert!(!matches(&doc! {}, &doc! { "age": { "$lte": 30 } }).unwrap());
    }

    #[test]
    fn regex_honours_case_option() {
        let d = doc! { "username": "Tobias" };
        assert!(matches(&d, &doc! { "username": { "$regex": "tob", "$options": "i" } }).unwrap());
        assert!(!matches(&d, &doc! { "username": { "$regex": "tob" } }).unwrap());
    }

    #[test]
    fn unknown_operator_is_an_error() {
        assert!(matches(&doc! { "a": 1 }, &doc! { "a": { "$ne": 2 } }).is_err());
    }

    #[tokio::test]
    async fn decodes_matching_documents() {
        let store = MemoryStore::new(vec![doc! { "username": "tobi", "age": 30, "eye_color": "green" }], vec![]);
        let users = store.find_users(doc! {}).await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name.as_deref(), Some("tobi"));
        assert_eq!(users[0].eye_color.as_deref(), Some("green"));
    }
}
