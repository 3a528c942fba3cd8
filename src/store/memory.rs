use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ItemStore, Result, StoreError};
use crate::models::{Item, ItemUpdate};

/// In-memory item store.
///
/// Data is not persisted and is lost when the store is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    items: Arc<RwLock<HashMap<String, Item>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemStore for InMemoryStore {
    async fn get(&self, id: &str) -> Result<Option<Item>> {
        let items = self.items.read().await;
        Ok(items.get(id).cloned())
    }

    async fn put(&self, item: &Item) -> Result<()> {
        let mut items = self.items.write().await;
        items.insert(item.id.clone(), item.clone());
        Ok(())
    }

    async fn update(&self, id: &str, update: &ItemUpdate) -> Result<Item> {
        let mut items = self.items.write().await;
        let item = items.get_mut(id).ok_or_else(|| StoreError::NotFound {
            id: id.to_string(),
        })?;
        item.apply(update);
        Ok(item.clone())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut items = self.items.write().await;
        items
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })
    }

    async fn scan(&self) -> Result<Vec<Item>> {
        let items = self.items.read().await;
        Ok(items.values().cloned().collect())
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
