use std::sync::Arc;

use futures_util::future::join_all;
use serde_json::Value;
use tracing::warn;

use crate::connection::ConnectionAdapter;
use crate::publish::event::{EventKind, PublicationPayload, WireMessage};
use crate::registry::topic::TopicKey;
use crate::registry::SubscriptionRegistry;
use crate::utils::error::PublishError;

/// Drives delivery of publication events to the current subscribers of a
/// topic.
///
/// Membership is re-read from the registry on every publish; nothing is
/// cached across calls. Fan-out is one independent delivery future per
/// subscriber: a slow or unreachable target neither delays nor fails the
/// rest of the batch. The first unreachable push for a subscriber evicts it
/// from the topic and abandons its remaining messages; this is the lazy
/// self-healing path for stale connections.
pub struct PublicationEngine {
    registry: Arc<SubscriptionRegistry>,
    adapter: Arc<dyn ConnectionAdapter>,
}

impl PublicationEngine {
    pub fn new(registry: Arc<SubscriptionRegistry>, adapter: Arc<dyn ConnectionAdapter>) -> Self {
        Self { registry, adapter }
    }

    /// Delivers a QUERY-type response to exactly one connection, without
    /// consulting the registry. A failed push is logged but not evicted:
    /// the target need not be a subscriber of the topic at all.
    pub async fn publish_to_one(
        &self,
        connection_id: &str,
        key: &TopicKey,
        object_id: &str,
        payload: PublicationPayload,
    ) -> Result<(), PublishError> {
        let messages = Self::encode_messages(key, EventKind::Query, object_id, &payload)?;
        for text in messages {
            if let Err(err) = self.adapter.push(connection_id, text).await {
                warn!(topic = %key, connection = connection_id, %err, "query delivery failed");
                break;
            }
        }
        Ok(())
    }

    pub async fn publish_insert(
        &self,
        key: &TopicKey,
        object_id: &str,
        payload: PublicationPayload,
    ) -> Result<(), PublishError> {
        self.fan_out(key, EventKind::Insert, object_id, payload).await
    }

    pub async fn publish_update(
        &self,
        key: &TopicKey,
        object_id: &str,
        payload: PublicationPayload,
    ) -> Result<(), PublishError> {
        self.fan_out(key, EventKind::Update, object_id, payload).await
    }

    /// Publishes a deletion; `identifier` names the removed item and is the
    /// whole payload.
    pub async fn publish_delete(
        &self,
        key: &TopicKey,
        object_id: &str,
        identifier: &str,
    ) -> Result<(), PublishError> {
        self.fan_out(
            key,
            EventKind::Delete,
            object_id,
            PublicationPayload::Identifier(identifier.to_string()),
        )
        .await
    }

    async fn fan_out(
        &self,
        key: &TopicKey,
        kind: EventKind,
        object_id: &str,
        payload: PublicationPayload,
    ) -> Result<(), PublishError> {
        let subscribers = self.registry.get_subscribers(key).await?;
        if subscribers.is_empty() {
            return Ok(());
        }
        let messages = Self::encode_messages(key, kind, object_id, &payload)?;

        let deliveries = subscribers
            .iter()
            .map(|entry| self.deliver_all(key, &entry.connection_id, &messages));
        join_all(deliveries).await;
        Ok(())
    }

    /// Delivers every message of one event to one subscriber, in order,
    /// evicting the subscriber from the topic on the first unreachable
    /// push.
    async fn deliver_all(&self, key: &TopicKey, connection_id: &str, messages: &[String]) {
        for text in messages {
            if let Err(err) = self.adapter.push(connection_id, text.clone()).await {
                warn!(topic = %key, connection = connection_id, %err, "delivery failed, evicting subscriber");
                if let Err(store_err) = self.registry.unsubscribe(key, connection_id).await {
                    warn!(topic = %key, connection = connection_id, %store_err, "eviction failed");
                }
                return;
            }
        }
    }

    fn encode_messages(
        key: &TopicKey,
        kind: EventKind,
        object_id: &str,
        payload: &PublicationPayload,
    ) -> Result<Vec<String>, serde_json::Error> {
        let name = key.subscription_name.as_str();
        let messages = match payload {
            PublicationPayload::Single(item) => {
                vec![WireMessage::event(name, kind, object_id, item.clone(), false)]
            }
            PublicationPayload::Collection(items) => vec![WireMessage::event(
                name,
                kind,
                object_id,
                Value::Array(items.clone()),
                true,
            )],
            PublicationPayload::Each(items) => items
                .iter()
                .map(|item| WireMessage::event(name, kind, object_id, item.clone(), false))
                .collect(),
            PublicationPayload::Identifier(id) => vec![WireMessage::event(
                name,
                kind,
                object_id,
                Value::String(id.clone()),
                false,
            )],
        };
        messages.iter().map(WireMessage::encode).collect()
    }
}
