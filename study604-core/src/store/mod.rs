// Boundary to the remote row store.
// The store only knows about untyped, flat rows in named
// collections. Typed access is provided by the `access` module.

use std::fmt;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

#[cfg(any(test, feature = "memory"))]
pub mod memory;

/// A single row as it crosses the boundary.
pub type Row = Map<String, Value>;

/// The collections (tables) of the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Spots,
    Saved,
    Reviews,
}

impl Collection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spots => "spots",
            Self::Saved => "saved",
            Self::Reviews => "reviews",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    #[error("The requested row could not be found")]
    NotFound,
    #[error("More than one row in '{collection}' matches id {id}")]
    AmbiguousResult { collection: Collection, id: String },
    #[error("The request to the store timed out")]
    Timeout,
    #[error("The store rejected the credentials")]
    Unauthorized,
    #[error("Failed to reach the store: {0}")]
    Transport(String),
    #[error("The store rejected the query: {0}")]
    Query(String),
    #[error("Invalid row in '{collection}': {reason}")]
    InvalidRow {
        collection: Collection,
        reason: String,
    },
}

impl Error {
    /// Failures talking to the store that can be
    /// recovered from by repeating the user action.
    pub const fn is_store_error(&self) -> bool {
        matches!(
            self,
            Self::Timeout
                | Self::Unauthorized
                | Self::Transport(_)
                | Self::Query(_)
                | Self::InvalidRow { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Compares a column value with a filter value.
///
/// Filter values are given as strings to make numeric
/// and textual ids comparable.
pub fn value_matches(value: &Value, filter: &str) -> bool {
    match value {
        Value::String(s) => s == filter,
        Value::Number(n) => n.to_string() == filter,
        Value::Bool(b) => b.to_string() == filter,
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    /// All rows of a collection in insertion order.
    async fn select_all(&self, collection: Collection) -> Result<Vec<Row>>;

    /// All rows of a collection whose `field` equals `value`.
    async fn select_where(&self, collection: Collection, field: &str, value: &str)
        -> Result<Vec<Row>>;

    async fn select_by_id(&self, collection: Collection, id: &str) -> Result<Vec<Row>> {
        self.select_where(collection, "id", id).await
    }

    /// Inserts a single row and returns the stored row including
    /// all fields that have been assigned by the store.
    async fn insert(&self, collection: Collection, row: Row) -> Result<Row>;

    /// Deletes the row with the given id.
    ///
    /// Deleting a row that doesn't exist is not an error.
    async fn delete(&self, collection: Collection, id: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn match_numeric_and_textual_values() {
        assert!(value_matches(&json!(7), "7"));
        assert!(value_matches(&json!("7"), "7"));
        assert!(!value_matches(&json!(7.5), "7"));
        assert!(value_matches(&json!(true), "true"));
        assert!(!value_matches(&Value::Null, "null"));
    }

    #[test]
    fn classify_errors() {
        assert!(Error::Timeout.is_store_error());
        assert!(Error::Transport("connection refused".into()).is_store_error());
        assert!(!Error::NotFound.is_store_error());
        assert!(!Error::AmbiguousResult {
            collection: Collection::Spots,
            id: "1".into()
        }
        .is_store_error());
    }
}
