use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;
use tungstenite::protocol::Message as WsMessage;

use crate::registry::topic::ConnectionId;
use crate::utils::error::DeliveryError;

/// Boundary for pushing a payload to one persistent connection.
///
/// An `Err(Unreachable)` means the transport endpoint behind the id is
/// gone; the publication engine turns that into an eviction.
#[async_trait]
pub trait ConnectionAdapter: Send + Sync {
    async fn push(&self, connection_id: &str, payload: String) -> Result<(), DeliveryError>;
}

/// Connection table for the WebSocket gateway.
///
/// Maps a connection id to the channel feeding that connection's outbound
/// socket task. A missing entry or a closed channel is reported as
/// unreachable.
#[derive(Debug, Default)]
pub struct WsConnections {
    senders: Mutex<HashMap<ConnectionId, UnboundedSender<WsMessage>>>,
}

impl WsConnections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, connection_id: &str, sender: UnboundedSender<WsMessage>) {
        let mut senders = self.senders.lock().unwrap();
        senders.insert(connection_id.to_string(), sender);
        debug!(connection = connection_id, "connection registered");
    }

    pub fn deregister(&self, connection_id: &str) {
        let mut senders = self.senders.lock().unwrap();
        senders.remove(connection_id);
        debug!(connection = connection_id, "connection deregistered");
    }

    pub fn contains(&self, connection_id: &str) -> bool {
        self.senders.lock().unwrap().contains_key(connection_id)
    }
}

#[async_trait]
impl ConnectionAdapter for WsConnections {
    async fn push(&self, connection_id: &str, payload: String) -> Result<(), DeliveryError> {
        let sender = {
            let senders = self.senders.lock().unwrap();
            senders.get(connection_id).cloned()
        };
        let Some(sender) = sender else {
            return Err(DeliveryError::Unreachable(connection_id.to_string()));
        };
        sender
            .send(WsMessage::text(payload))
            .map_err(|_| DeliveryError::Unreachable(connection_id.to_string()))
    }
}
