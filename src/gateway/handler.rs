use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::connection::ConnectionAdapter;
use crate::gateway::message::{parse_inbound, Inbound, SubscriptionRequest};
use crate::publish::{PublicationEngine, PublicationPayload, WireMessage};
use crate::registry::topic::{ConnectionId, TopicKey};
use crate::registry::SubscriptionRegistry;

/// Reserved subscription name on lifecycle notice/error replies, which
/// carry no topic of their own.
pub const LIFECYCLE_SUBSCRIPTION: &str = "connection";

/// Supplies the current domain data for a topic so a freshly subscribed
/// connection can be primed without waiting for the next mutation.
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    /// `None` when no snapshot exists for the key.
    async fn snapshot(&self, key: &TopicKey) -> Option<Vec<Value>>;
}

/// Per-connection lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Transport open, no topic membership yet.
    Connected,
    /// Holds at least one topic subscription.
    Registered,
}

#[derive(Debug)]
struct Session {
    state: ConnectionState,
    /// Reverse index: every topic this connection has joined, so disconnect
    /// can unsubscribe all of them.
    topics: HashSet<TopicKey>,
}

impl Session {
    fn new() -> Self {
        Self {
            state: ConnectionState::Connected,
            topics: HashSet::new(),
        }
    }

    fn join(&mut self, key: TopicKey) {
        self.topics.insert(key);
        self.state = ConnectionState::Registered;
    }

    fn leave(&mut self, key: &TopicKey) {
        self.topics.remove(key);
        if self.topics.is_empty() {
            self.state = ConnectionState::Connected;
        }
    }
}

/// Translates gateway-level connect/disconnect/inbound-message signals into
/// registry operations.
///
/// Sessions track the full set of topics a connection has joined;
/// disconnect unsubscribes every one of them, not just the default topic.
/// Dropping the session is the terminal (closed) state.
pub struct LifecycleHandler {
    registry: Arc<SubscriptionRegistry>,
    publisher: Arc<PublicationEngine>,
    adapter: Arc<dyn ConnectionAdapter>,
    snapshots: Option<Arc<dyn SnapshotProvider>>,
    default_topic: Option<TopicKey>,
    sessions: Mutex<HashMap<ConnectionId, Session>>,
}

impl LifecycleHandler {
    pub fn new(
        registry: Arc<SubscriptionRegistry>,
        publisher: Arc<PublicationEngine>,
        adapter: Arc<dyn ConnectionAdapter>,
        snapshots: Option<Arc<dyn SnapshotProvider>>,
        default_topic: Option<TopicKey>,
    ) -> Self {
        Self {
            registry,
            publisher,
            adapter,
            snapshots,
            default_topic,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Gateway connect signal: opens a session and, when configured,
    /// subscribes the connection to the default topic.
    pub async fn on_connect(&self, connection_id: &str) {
        {
            let mut sessions = self.sessions.lock().unwrap();
            sessions.insert(connection_id.to_string(), Session::new());
        }
        info!(connection = connection_id, "connection opened");

        if let Some(topic) = self.default_topic.clone() {
            match self.registry.subscribe(&topic, connection_id, None).await {
                Ok(()) => self.track(connection_id, topic),
                Err(err) => {
                    warn!(connection = connection_id, %err, "default topic subscribe failed");
                }
            }
        }
    }

    /// Routes one inbound text message from a connection.
    pub async fn on_message(&self, connection_id: &str, text: &str) {
        match parse_inbound(text) {
            Inbound::Subscription(request) if request.subscribe => {
                self.handle_subscribe(connection_id, request).await;
            }
            Inbound::Subscription(request) => {
                self.handle_unsubscribe(connection_id, &request.topic_key).await;
            }
            Inbound::Malformed(reason) => {
                debug!(connection = connection_id, %reason, "malformed request");
                self.reply(
                    connection_id,
                    WireMessage::error(LIFECYCLE_SUBSCRIPTION, "bad request"),
                )
                .await;
            }
            Inbound::Unroutable => {
                debug!(connection = connection_id, "unroutable message");
                self.reply(
                    connection_id,
                    WireMessage::notice(LIFECYCLE_SUBSCRIPTION, "no handler for message"),
                )
                .await;
            }
        }
    }

    /// Gateway disconnect signal: unsubscribes every joined topic and drops
    /// the session.
    pub async fn on_disconnect(&self, connection_id: &str) {
        let topics = {
            let mut sessions = self.sessions.lock().unwrap();
            sessions
                .remove(connection_id)
                .map(|session| session.topics)
                .unwrap_or_default()
        };
        for topic in topics {
            if let Err(err) = self.registry.unsubscribe(&topic, connection_id).await {
                warn!(connection = connection_id, topic = %topic, %err, "disconnect cleanup failed");
            }
        }
        info!(connection = connection_id, "connection closed");
    }

    pub fn state_of(&self, connection_id: &str) -> Option<ConnectionState> {
        let sessions = self.sessions.lock().unwrap();
        sessions.get(connection_id).map(|session| session.state)
    }

    async fn handle_subscribe(&self, connection_id: &str, request: SubscriptionRequest) {
        let key = request.topic_key;
        if let Err(err) = self
            .registry
            .subscribe(&key, connection_id, request.user_id)
            .await
        {
            warn!(connection = connection_id, topic = %key, %err, "subscribe failed");
            self.reply(
                connection_id,
                WireMessage::error(&key.subscription_name, "subscribe failed"),
            )
            .await;
            return;
        }
        self.track(connection_id, key.clone());

        // Prime the new subscriber with the current domain state so it need
        // not wait for the next mutation.
        if let Some(provider) = &self.snapshots {
            if let Some(items) = provider.snapshot(&key).await {
                let object_id = key.item_id.clone();
                if let Err(err) = self
                    .publisher
                    .publish_to_one(
                        connection_id,
                        &key,
                        &object_id,
                        PublicationPayload::Collection(items),
                    )
                    .await
                {
                    warn!(connection = connection_id, topic = %key, %err, "snapshot priming failed");
                }
            }
        }
    }

    async fn handle_unsubscribe(&self, connection_id: &str, key: &TopicKey) {
        if let Err(err) = self.registry.unsubscribe(key, connection_id).await {
            warn!(connection = connection_id, topic = %key, %err, "unsubscribe failed");
            self.reply(
                connection_id,
                WireMessage::error(&key.subscription_name, "unsubscribe failed"),
            )
            .await;
            return;
        }
        let mut sessions = self.sessions.lock().unwrap();
        if let Some(session) = sessions.get_mut(connection_id) {
            session.leave(key);
        }
    }

    fn track(&self, connection_id: &str, key: TopicKey) {
        let mut sessions = self.sessions.lock().unwrap();
        if let Some(session) = sessions.get_mut(connection_id) {
            session.join(key);
        }
    }

    async fn reply(&self, connection_id: &str, message: WireMessage) {
        let text = match message.encode() {
            Ok(text) => text,
            Err(err) => {
                warn!(connection = connection_id, %err, "failed to encode reply");
                return;
            }
        };
        if let Err(err) = self.adapter.push(connection_id, text).await {
            debug!(connection = connection_id, %err, "reply not delivered");
        }
    }
}
