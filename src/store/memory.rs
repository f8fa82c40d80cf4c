/// In-process document store
use super::DocumentStore;
use crate::error::AmoraResult;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Document store kept in memory; contents are lost on restart
#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, key: &str) -> AmoraResult<Option<String>> {
        Ok(self.documents.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, document: String) -> AmoraResult<()> {
        self.documents.write().await.insert(key.to_string(), document);
        Ok(())
    }

    async fn remove(&self, key: &str) -> AmoraResult<()> {
        self.documents.write().await.remove(key);
        Ok(())
    }

    async fn clear(&self) -> AmoraResult<()> {
        self.documents.write().await.clear();
        Ok(())
    }

    async fn keys(&self) -> AmoraResult<Vec<String>> {
        let mut keys: Vec<String> = self.documents.read().await.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}
