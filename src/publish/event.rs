use serde::Serialize;
use serde_json::Value;

/// Kind of a publication event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventKind {
    Query,
    Insert,
    Update,
    Delete,
}

/// Shape of the data travelling with a publication.
///
/// The variant encodes how a sequence is delivered, so no separate
/// collection flag travels through the engine:
///
/// - `Single`: one item, one message per subscriber.
/// - `Collection`: a sequence delivered whole, one message per subscriber.
/// - `Each`: a sequence expanded into one message per element per
///   subscriber.
/// - `Identifier`: the id of a deleted item.
#[derive(Debug, Clone)]
pub enum PublicationPayload {
    Single(Value),
    Collection(Vec<Value>),
    Each(Vec<Value>),
    Identifier(String),
}

/// Envelope pushed to a connection.
///
/// `notice`/`error` carry out-of-band lifecycle messages and are never
/// combined with `data` in the same message.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMessage {
    pub subscription: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<EventKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_collection: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WireMessage {
    pub fn event(
        subscription: &str,
        kind: EventKind,
        object_id: &str,
        data: Value,
        is_collection: bool,
    ) -> Self {
        Self {
            subscription: subscription.to_string(),
            kind: Some(kind),
            object_id: Some(object_id.to_string()),
            is_collection: Some(is_collection),
            data: Some(data),
            notice: None,
            error: None,
        }
    }

    pub fn notice(subscription: &str, text: &str) -> Self {
        Self {
            subscription: subscription.to_string(),
            kind: None,
            object_id: None,
            is_collection: None,
            data: None,
            notice: Some(text.to_string()),
            error: None,
        }
    }

    pub fn error(subscription: &str, text: &str) -> Self {
        Self {
            subscription: subscription.to_string(),
            kind: None,
            object_id: None,
            is_collection: None,
            data: None,
            notice: None,
            error: Some(text.to_string()),
        }
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
