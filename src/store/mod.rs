//! Item persistence.
//!
//! Operations depend on the `ItemStore` trait only. `DynamoDbStore` talks to
//! the configured table; `InMemoryStore` backs local runs and tests.

mod dynamodb;
mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{Config, StoreBackend};
use crate::models::{Item, ItemUpdate};

pub use dynamodb::DynamoDbStore;
pub use memory::InMemoryStore;

/// Errors that can occur during store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Item not found: {id}")]
    NotFound { id: String },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Key-value access to items, keyed by `id`.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Gets an item by its id.
    async fn get(&self, id: &str) -> Result<Option<Item>>;

    /// Writes an item unconditionally.
    async fn put(&self, item: &Item) -> Result<()>;

    /// Applies a partial update and returns the full updated item.
    ///
    /// Fails with `StoreError::NotFound` without writing if the id is absent.
    async fn update(&self, id: &str, update: &ItemUpdate) -> Result<Item>;

    /// Deletes an item. Fails with `StoreError::NotFound` if the id is absent.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Returns every stored item, in no particular order.
    async fn scan(&self) -> Result<Vec<Item>>;

    /// Verifies the backing store is reachable.
    async fn health_check(&self) -> Result<()>;
}

/// Build the store selected by configuration.
///
/// Called once per process; the handle is shared by every request.
pub async fn connect(config: &Config) -> anyhow::Result<Arc<dyn ItemStore>> {
    match &config.store_backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory item store");
            Ok(Arc::new(InMemoryStore::new()))
        }
        StoreBackend::DynamoDb {
            table_name,
            endpoint,
        } => {
            let store = DynamoDbStore::connect(table_name, endpoint.as_deref()).await?;
            Ok(Arc::new(store))
        }
    }
}
