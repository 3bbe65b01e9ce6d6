use crate::adapters::memory_store::{InMemoryStore, Snapshot};
use crate::domain::ports::{Document, DocumentStore, Filter};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Document store backed by a JSON snapshot on disk. Reads are served from
/// memory; every write rewrites the file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: InMemoryStore,
    flush_lock: Mutex<()>,
}

impl JsonFileStore {
    /// 讀取既有的資料檔
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = tokio::fs::read_to_string(&path).await?;
        let snapshot: Snapshot = serde_json::from_str(&content)?;

        tracing::debug!(
            "Loaded {} collections from {}",
            snapshot.len(),
            path.display()
        );

        Ok(Self {
            path,
            inner: InMemoryStore::from_snapshot(snapshot)?,
            flush_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn flush(&self) -> Result<()> {
        let _guard = self.flush_lock.lock().await;
        let snapshot = self.inner.snapshot().await;
        let content = serde_json::to_string_pretty(&snapshot)?;

        // 先寫暫存檔再改名，避免寫到一半的檔案
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn get_one(&self, path: &str, filters: &[Filter]) -> Result<Document> {
        self.inner.get_one(path, filters).await
    }

    async fn get_many(&self, path: &str, filters: &[Filter]) -> Result<Vec<Document>> {
        self.inner.get_many(path, filters).await
    }

    async fn put(&self, collection: &str, record: Document) -> Result<String> {
        let id = self.inner.put(collection, record).await?;
        self.flush().await?;
        Ok(id)
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.inner.delete(path).await?;
        self.flush().await
    }
}
