use async_trait::async_trait;
use sled::Db;

use crate::registry::store::RegistryStore;
use crate::registry::topic::{SubscriberEntry, TopicKey, TopicRecord};
use crate::utils::error::StoreError;

/// Durable registry store backed by sled.
///
/// Topic records are JSON values keyed by the encoded topic key. Both
/// mutations go through `update_and_fetch`, sled's compare-and-swap retry
/// primitive, so an append never loses a concurrent append and a removal
/// re-reads the record it mutates.
pub struct SledRegistryStore {
    db: Db,
}

impl SledRegistryStore {
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    // Unit separator keeps the three opaque segments unambiguous.
    fn encode_key(key: &TopicKey) -> Vec<u8> {
        format!(
            "{}\u{1f}{}\u{1f}{}",
            key.subscription_name, key.item_type, key.item_id
        )
        .into_bytes()
    }
}

#[async_trait]
impl RegistryStore for SledRegistryStore {
    async fn get(&self, key: &TopicKey) -> Result<Option<TopicRecord>, StoreError> {
        let Some(bytes) = self.db.get(Self::encode_key(key))? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    async fn append_subscriber(
        &self,
        key: &TopicKey,
        entry: SubscriberEntry,
    ) -> Result<(), StoreError> {
        let mut codec_failure: Option<serde_json::Error> = None;
        self.db.update_and_fetch(Self::encode_key(key), |old| {
            // The closure may rerun on CAS contention; only the final
            // attempt's outcome counts.
            codec_failure = None;
            let mut record = match old {
                Some(bytes) => match serde_json::from_slice::<TopicRecord>(bytes) {
                    Ok(record) => record,
                    Err(err) => {
                        codec_failure = Some(err);
                        return old.map(|b| b.to_vec());
                    }
                },
                None => TopicRecord::new(key.clone()),
            };
            record.subscribers.push(entry.clone());
            match serde_json::to_vec(&record) {
                Ok(bytes) => Some(bytes),
                Err(err) => {
                    codec_failure = Some(err);
                    old.map(|b| b.to_vec())
                }
            }
        })?;
        match codec_failure {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    async fn remove_subscriber_at(&self, key: &TopicKey, index: usize) -> Result<(), StoreError> {
        let mut codec_failure: Option<serde_json::Error> = None;
        self.db.update_and_fetch(Self::encode_key(key), |old| {
            codec_failure = None;
            let bytes = old?;
            let mut record = match serde_json::from_slice::<TopicRecord>(bytes) {
                Ok(record) => record,
                Err(err) => {
                    codec_failure = Some(err);
                    return Some(bytes.to_vec());
                }
            };
            if index < record.subscribers.len() {
                record.subscribers.remove(index);
            }
            match serde_json::to_vec(&record) {
                Ok(encoded) => Some(encoded),
                Err(err) => {
                    codec_failure = Some(err);
                    Some(bytes.to_vec())
                }
            }
        })?;
        match codec_failure {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for SledRegistryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SledRegistryStore")
            .field("db", &"sled::Db")
            .finish()
    }
}
