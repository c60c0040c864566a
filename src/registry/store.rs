use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::registry::topic::{SubscriberEntry, TopicKey, TopicRecord};
use crate::utils::error::StoreError;

/// Durable keyed storage for topic records.
///
/// The registry is generic over this seam so it can run against sled in
/// production and an in-memory table in tests. `append_subscriber` is the
/// one operation that must be atomic: two concurrent appends to the same
/// key must both be visible afterward, without a read-modify-write window.
#[async_trait]
pub trait RegistryStore: Send + Sync {
    async fn get(&self, key: &TopicKey) -> Result<Option<TopicRecord>, StoreError>;

    /// Atomically appends an entry, creating the record if absent.
    async fn append_subscriber(
        &self,
        key: &TopicKey,
        entry: SubscriberEntry,
    ) -> Result<(), StoreError>;

    /// Removes the entry at `index`. A missing record or an out-of-bounds
    /// index is a silent no-op.
    async fn remove_subscriber_at(&self, key: &TopicKey, index: usize) -> Result<(), StoreError>;
}

/// In-memory registry store, used by tests and single-process deployments.
#[derive(Debug, Default)]
pub struct MemoryRegistryStore {
    records: RwLock<HashMap<TopicKey, TopicRecord>>,
}

impl MemoryRegistryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of topic records held, empty ones included.
    pub async fn record_count(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl RegistryStore for MemoryRegistryStore {
    async fn get(&self, key: &TopicKey) -> Result<Option<TopicRecord>, StoreError> {
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn append_subscriber(
        &self,
        key: &TopicKey,
        entry: SubscriberEntry,
    ) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        records
            .entry(key.clone())
            .or_insert_with(|| TopicRecord::new(key.clone()))
            .subscribers
            .push(entry);
        Ok(())
    }

    async fn remove_subscriber_at(&self, key: &TopicKey, index: usize) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        if let Some(record) = records.get_mut(key) {
            if index < record.subscribers.len() {
                record.subscribers.remove(index);
            }
        }
        Ok(())
    }
}
