use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::registry::store::RegistryStore;
use crate::registry::topic::{SubscriberEntry, TopicKey};
use crate::utils::error::StoreError;

/// Owns the mapping from a topic key to its ordered subscriber list.
///
/// All membership mutation in the system goes through the three operations
/// here; no caller caches subscriber lists across calls. Additions rely on
/// the store's atomic append. Removals are a read-then-remove-by-index
/// sequence, so they are serialized per topic key: a concurrent removal on
/// the same key cannot compute a stale index, and a concurrent append lands
/// at the tail, which never shifts a held index.
///
/// The lock table holds one entry per topic key ever removed from and is
/// never pruned; like empty topic records, it grows with the topic
/// vocabulary, which is a closed domain set, not with traffic.
pub struct SubscriptionRegistry {
    store: Arc<dyn RegistryStore>,
    removal_locks: Mutex<HashMap<TopicKey, Arc<tokio::sync::Mutex<()>>>>,
}

impl SubscriptionRegistry {
    pub fn new(store: Arc<dyn RegistryStore>) -> Self {
        Self {
            store,
            removal_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Registers `connection_id` under `key`, creating the topic record on
    /// first use. Idempotent: an existing entry for the connection leaves
    /// the record unchanged.
    pub async fn subscribe(
        &self,
        key: &TopicKey,
        connection_id: &str,
        user_id: Option<String>,
    ) -> Result<(), StoreError> {
        if let Some(record) = self.store.get(key).await? {
            if record.contains(connection_id) {
                return Ok(());
            }
        }
        self.store
            .append_subscriber(key, SubscriberEntry::new(connection_id, user_id))
            .await?;
        debug!(topic = %key, connection = connection_id, "subscribed");
        Ok(())
    }

    /// Removes the entry for `connection_id` under `key`. An unknown topic
    /// or an absent entry is a no-op, never an error.
    pub async fn unsubscribe(&self, key: &TopicKey, connection_id: &str) -> Result<(), StoreError> {
        let lock = self.removal_lock(key);
        let _guard = lock.lock().await;

        let Some(record) = self.store.get(key).await? else {
            return Ok(());
        };
        let Some(index) = record.position_of(connection_id) else {
            return Ok(());
        };
        self.store.remove_subscriber_at(key, index).await?;
        debug!(topic = %key, connection = connection_id, "unsubscribed");
        Ok(())
    }

    /// Current subscribers of `key`; empty for a missing or emptied topic.
    pub async fn get_subscribers(
        &self,
        key: &TopicKey,
    ) -> Result<Vec<SubscriberEntry>, StoreError> {
        Ok(self
            .store
            .get(key)
            .await?
            .map(|record| record.subscribers)
            .unwrap_or_default())
    }

    fn removal_lock(&self, key: &TopicKey) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.removal_locks.lock().unwrap();
        locks.entry(key.clone()).or_default().clone()
    }
}
