use crate::domain::ports::{Document, DocumentStore, Filter, FilterOp};
use crate::utils::error::{PlannerError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use tokio::sync::RwLock;

/// Serialized form of a store: collection path -> documents in storage order.
/// Each document carries its id under `"id"`.
pub type Snapshot = BTreeMap<String, Vec<Document>>;

type Collection = Vec<(String, Document)>;

/// Document store kept in memory. Collections preserve insertion order,
/// which is the "storage order" the planner relies on.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
    next_id: AtomicU64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        let mut collections = HashMap::new();
        let mut count = 0u64;

        for (path, documents) in snapshot {
            let mut collection = Vec::with_capacity(documents.len());
            for mut document in documents {
                let id = match document.remove("id") {
                    Some(Value::String(id)) if !id.is_empty() => id,
                    _ => {
                        return Err(PlannerError::store(format!(
                            "document in {} is missing a string id",
                            path
                        )))
                    }
                };
                collection.push((id, document));
                count += 1;
            }
            collections.insert(path, collection);
        }

        Ok(Self {
            collections: RwLock::new(collections),
            next_id: AtomicU64::new(count),
        })
    }

    pub async fn snapshot(&self) -> Snapshot {
        let collections = self.collections.read().await;
        collections
            .iter()
            .map(|(path, documents)| {
                let documents = documents
                    .iter()
                    .map(|(id, body)| with_id(id, body))
                    .collect();
                (path.clone(), documents)
            })
            .collect()
    }

    fn allocate_id(&self) -> String {
        let n = self.next_id.fetch_add(1, AtomicOrdering::Relaxed) + 1;
        format!("doc-{:06}", n)
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn get_one(&self, path: &str, filters: &[Filter]) -> Result<Document> {
        if !filters.is_empty() {
            let mut matches = self.get_many(path, filters).await?;
            if matches.len() != 1 {
                return Err(PlannerError::not_found("Document", path));
            }
            return Ok(matches.remove(0));
        }

        let (collection_path, id) = split_document_path(path)?;
        let collections = self.collections.read().await;
        collections
            .get(collection_path)
            .and_then(|documents| documents.iter().find(|(doc_id, _)| doc_id == id))
            .map(|(doc_id, body)| with_id(doc_id, body))
            .ok_or_else(|| PlannerError::not_found("Document", path))
    }

    async fn get_many(&self, path: &str, filters: &[Filter]) -> Result<Vec<Document>> {
        let collections = self.collections.read().await;
        let Some(documents) = collections.get(path.trim_matches('/')) else {
            return Ok(Vec::new());
        };

        Ok(documents
            .iter()
            .map(|(id, body)| with_id(id, body))
            .filter(|document| filters.iter().all(|filter| matches_filter(document, filter)))
            .collect())
    }

    async fn put(&self, collection: &str, mut record: Document) -> Result<String> {
        let collection = collection.trim_matches('/');
        if collection.is_empty() || collection.split('/').count() % 2 == 0 {
            return Err(PlannerError::store(format!(
                "'{}' is not a collection path",
                collection
            )));
        }

        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.to_string()).or_default();

        let id = match record.remove("id") {
            Some(Value::String(id)) if !id.is_empty() => id,
            _ => loop {
                let candidate = self.allocate_id();
                if documents.iter().all(|(doc_id, _)| *doc_id != candidate) {
                    break candidate;
                }
            },
        };

        match documents.iter_mut().find(|(doc_id, _)| *doc_id == id) {
            Some((_, body)) => *body = record,
            None => documents.push((id.clone(), record)),
        }

        tracing::debug!("Stored document {}/{}", collection, id);
        Ok(id)
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let (collection_path, id) = split_document_path(path)?;
        let mut collections = self.collections.write().await;
        if let Some(documents) = collections.get_mut(collection_path) {
            documents.retain(|(doc_id, _)| doc_id != id);
        }
        Ok(())
    }
}

fn split_document_path(path: &str) -> Result<(&str, &str)> {
    let path = path.trim_matches('/');
    match path.rsplit_once('/') {
        Some((collection, id)) if path.split('/').count() % 2 == 0 && !id.is_empty() => {
            Ok((collection, id))
        }
        _ => Err(PlannerError::store(format!(
            "'{}' is not a document path",
            path
        ))),
    }
}

fn with_id(id: &str, body: &Document) -> Document {
    let mut document = body.clone();
    document.insert("id".to_string(), Value::String(id.to_string()));
    document
}

fn matches_filter(document: &Document, filter: &Filter) -> bool {
    let Some(field) = document.get(&filter.field) else {
        return false;
    };

    match filter.op {
        FilterOp::Eq => field == &filter.value,
        FilterOp::Ne => field != &filter.value,
        FilterOp::Lt => compare(field, &filter.value) == Some(Ordering::Less),
        FilterOp::Le => matches!(
            compare(field, &filter.value),
            Some(Ordering::Less | Ordering::Equal)
        ),
        FilterOp::Gt => compare(field, &filter.value) == Some(Ordering::Greater),
        FilterOp::Ge => matches!(
            compare(field, &filter.value),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        FilterOp::ArrayContains => field
            .as_array()
            .is_some_and(|items| items.contains(&filter.value)),
        FilterOp::In => filter
            .value
            .as_array()
            .is_some_and(|items| items.contains(field)),
    }
}

fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}
