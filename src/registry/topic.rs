use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Sentinel `item_id` addressing a collection-level feed ("every item of
/// this type") rather than a single instance.
pub const COLLECTION_ITEM_ID: &str = "*";

/// Opaque identifier assigned by the connection adapter, unique for the
/// lifetime of one physical connection.
pub type ConnectionId = String;

/// Composite identifier addressing a fan-out target.
///
/// A topic key names a logical feed (`subscription_name`), an entity kind
/// (`item_type`), and an instance (`item_id`, or [`COLLECTION_ITEM_ID`] for
/// collection-level feeds). Keys are opaque and case-sensitive; equality is
/// exact tuple equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicKey {
    pub subscription_name: String,
    pub item_type: String,
    pub item_id: String,
}

impl TopicKey {
    pub fn new(subscription_name: &str, item_type: &str, item_id: &str) -> Self {
        Self {
            subscription_name: subscription_name.to_string(),
            item_type: item_type.to_string(),
            item_id: item_id.to_string(),
        }
    }

    /// Key for the collection-level feed of an entity kind.
    pub fn collection(subscription_name: &str, item_type: &str) -> Self {
        Self::new(subscription_name, item_type, COLLECTION_ITEM_ID)
    }
}

impl fmt::Display for TopicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.subscription_name, self.item_type, self.item_id
        )
    }
}

/// A registered connection's membership record in a topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberEntry {
    pub connection_id: ConnectionId,
    pub user_id: Option<String>,
    /// Unix timestamp of the join, stamped at subscribe time.
    pub subscribed_at: i64,
}

impl SubscriberEntry {
    pub fn new(connection_id: &str, user_id: Option<String>) -> Self {
        Self {
            connection_id: connection_id.to_string(),
            user_id,
            subscribed_at: Utc::now().timestamp(),
        }
    }
}

/// A topic and its ordered subscriber list.
///
/// Created lazily on the first subscribe to a previously-unseen key. The
/// order of `subscribers` is insertion order; it serves only as the removal
/// index and carries no delivery-order guarantee. A record whose list
/// becomes empty persists as an empty record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicRecord {
    pub key: TopicKey,
    pub subscribers: Vec<SubscriberEntry>,
}

impl TopicRecord {
    pub fn new(key: TopicKey) -> Self {
        Self {
            key,
            subscribers: Vec::new(),
        }
    }

    /// Index of the entry for `connection_id`, if registered.
    pub fn position_of(&self, connection_id: &str) -> Option<usize> {
        self.subscribers
            .iter()
            .position(|entry| entry.connection_id == connection_id)
    }

    pub fn contains(&self, connection_id: &str) -> bool {
        self.position_of(connection_id).is_some()
    }
}
