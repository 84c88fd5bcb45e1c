use std::time::Duration;

use async_graphql::{ErrorExtensions, FieldError};
use mongodb::error::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("query timed out after {0:?}")]
    Timeout(Duration),
    #[error("document store error: {0}")]
    Driver(String),
    #[error("cannot decode document: {0}")]
    Decode(String),
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Timeout(_) => "TIMEOUT",
            StoreError::Driver(_) => "STORE_ERROR",
            StoreError::Decode(_) => "DECODE_ERROR",
        }
    }
}

impl From<mongodb::error::Error> for StoreError {
    fn from(e: mongodb::error::Error) -> Self {
        match *e.kind {
            ErrorKind::BsonDeserialization(ref inner) => StoreError::Decode(inner.to_string()),
            _ => StoreError::Driver(e.to_string()),
        }
    }
}

impl ErrorExtensions for StoreError {
    fn extend(&self) -> FieldError {
        FieldError::new(self.to_string()).extend_with(|_, ext| ext.set("code", self.code()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graphql_error_carries_code() {
        let err = StoreError::Timeout(Duration::from_secs(5)).extend();
        assert!(err.message.contains("timed out"));
        let ext = err.extensions.expect("extensions");
        assert_eq!(ext.get("code"), Some(&async_graphql::Value::from("TIMEOUT")));
    }
}
