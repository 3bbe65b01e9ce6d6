use crate::domain::model::Course;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A stored record. The store adds the document id under `"id"` on read.
pub type Document = serde_json::Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOp {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "array-contains")]
    ArrayContains,
    #[serde(rename = "in")]
    In,
}

/// `(field, operator, value)`; a filter list is ANDed together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Filter {
    pub fn new(field: &str, op: FilterOp, value: impl Into<Value>) -> Self {
        Self {
            field: field.to_string(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(field: &str, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOp::Eq, value)
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Without filters `path` names a document; with filters it names a
    /// collection that must hold exactly one match.
    async fn get_one(&self, path: &str, filters: &[Filter]) -> Result<Document>;
    async fn get_many(&self, path: &str, filters: &[Filter]) -> Result<Vec<Document>>;
    /// Writes to `collection/{id}` when the record carries an id, otherwise
    /// allocates one. Returns the id.
    async fn put(&self, collection: &str, record: Document) -> Result<String>;
    async fn delete(&self, path: &str) -> Result<()>;
}

#[async_trait]
pub trait CourseCatalog: Send + Sync {
    async fn course(&self, short_name: &str) -> Result<Course>;
}

/// Source of the uniform choice among takeable options.
pub trait SuggestionPicker: Send {
    /// Returns an index in `0..len`. Never called with `len == 0`.
    fn pick(&mut self, len: usize) -> usize;
}
