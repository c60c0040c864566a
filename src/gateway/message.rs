use serde::Deserialize;
use serde_json::Value;

use crate::registry::topic::TopicKey;

/// Inbound subscription request:
/// `{ "topicKey": {...}, "subscribe": true|false, "userId"?: "..." }`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRequest {
    pub topic_key: TopicKey,
    pub subscribe: bool,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Classification of an inbound gateway message.
#[derive(Debug)]
pub enum Inbound {
    /// A well-formed subscription request.
    Subscription(SubscriptionRequest),
    /// Recognizably a subscription request but missing or invalid fields;
    /// answered with an error reply, no registry mutation.
    Malformed(String),
    /// Not a message this gateway routes; answered with a notice reply.
    Unroutable,
}

/// Classifies raw inbound text.
///
/// A message carrying a `topicKey` or `subscribe` field is treated as a
/// subscription request and must parse fully; anything else is unroutable.
pub fn parse_inbound(text: &str) -> Inbound {
    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(err) => return Inbound::Malformed(err.to_string()),
    };
    if value.get("topicKey").is_none() && value.get("subscribe").is_none() {
        return Inbound::Unroutable;
    }
    match serde_json::from_value::<SubscriptionRequest>(value) {
        Ok(request) => Inbound::Subscription(request),
        Err(err) => Inbound::Malformed(err.to_string()),
    }
}
