use crate::error::StorageError;
use crate::storage::{check_etag, stamp_etag, Storage, ETAG_KEY};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Process-local storage. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryStorage {
    documents: RwLock<HashMap<String, Value>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn read(&self, keys: &[String]) -> Result<HashMap<String, Value>, StorageError> {
        let documents = self.documents.read().await;
        Ok(keys
            .iter()
            .filter_map(|key| documents.get(key).map(|doc| (key.clone(), doc.clone())))
            .collect())
    }

    async fn write(
        &self,
        changes: HashMap<String, Value>,
    ) -> Result<HashMap<String, String>, StorageError> {
        let mut documents = self.documents.write().await;
        let mut etags = HashMap::with_capacity(changes.len());
        for (key, document) in changes {
            let stored_etag = documents
                .get(&key)
                .and_then(|doc| doc.get(ETAG_KEY))
                .and_then(Value::as_str);
            check_etag(&key, &document, stored_etag)?;
            let (document, etag) = stamp_etag(&key, document)?;
            debug!(key = %key, etag = %etag, "Wrote state document");
            documents.insert(key.clone(), document);
            etags.insert(key, etag);
        }
        Ok(etags)
    }

    async fn delete(&self, keys: &[String]) -> Result<(), StorageError> {
        let mut documents = self.documents.write().await;
        for key in keys {
            documents.remove(key);
        }
        Ok(())
    }
}
