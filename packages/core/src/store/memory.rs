//! In-Memory Document Store
//!
//! Reference `DocumentStore` implementation over `tokio::sync::RwLock`
//! maps: the primary map keyed by document id, plus a lowercased
//! `(project, resource)` composite index for case-insensitive lookup.

use crate::models::{composite_key, Document};
use crate::store::DocumentStore;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-local document store
#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<String, Document>>,
    by_composite: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, id: &str) -> Result<Option<Document>> {
        Ok(self.documents.read().await.get(id).cloned())
    }

    async fn find_by_key(&self, project_id: &str, resource_id: &str) -> Result<Option<Document>> {
        let key = composite_key(project_id, resource_id);
        let Some(id) = self.by_composite.read().await.get(&key).cloned() else {
            return Ok(None);
        };
        Ok(self.documents.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Document>> {
        Ok(self.documents.read().await.values().cloned().collect())
    }

    async fn put(&self, document: Document) -> Result<()> {
        let key = document.composite_key();
        self.by_composite
            .write()
            .await
            .insert(key, document.id.clone());
        self.documents
            .write()
            .await
            .insert(document.id.clone(), document);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let removed = self.documents.write().await.remove(id);
        if let Some(document) = &removed {
            self.by_composite
                .write()
                .await
                .remove(&document.composite_key());
        }
        Ok(removed.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocumentContent;

    fn sample_document() -> Document {
        Document::new("Proj", "Resource", None, DocumentContent::default())
    }

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let store = MemoryStore::new();
        let document = sample_document();
        let id = document.id.clone();

        store.put(document.clone()).await.unwrap();
        let fetched = store.get(&id).await.unwrap().unwrap();
        assert_eq!(fetched, document);
    }

    #[tokio::test]
    async fn test_find_by_key_case_insensitive() {
        let store = MemoryStore::new();
        let document = sample_document();
        let id = document.id.clone();
        store.put(document).await.unwrap();

        let fetched = store.find_by_key("pRoJ", "RESOURCE").await.unwrap().unwrap();
        assert_eq!(fetched.id, id);
        assert!(store.find_by_key("other", "resource").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_replaces_existing() {
        let store = MemoryStore::new();
        let mut document = sample_document();
        store.put(document.clone()).await.unwrap();

        document.title = Some("Renamed".to_string());
        store.put(document.clone()).await.unwrap();

        let fetched = store.get(&document.id).await.unwrap().unwrap();
        assert_eq!(fetched.title.as_deref(), Some("Renamed"));
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_clears_composite_index() {
        let store = MemoryStore::new();
        let document = sample_document();
        let id = document.id.clone();
        store.put(document).await.unwrap();

        assert!(store.delete(&id).await.unwrap());
        assert!(!store.delete(&id).await.unwrap());
        assert!(store.find_by_key("proj", "resource").await.unwrap().is_none());
    }
}
