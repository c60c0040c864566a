use thiserror::Error;

use crate::registry::topic::ConnectionId;

/// Failure of the registry store backing the subscription registry.
///
/// Surfaced as-is to subscribe/unsubscribe/publish callers; the registry
/// performs no internal retry.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("registry store backend error: {0}")]
    Backend(#[from] sled::Error),

    #[error("corrupt topic record: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Failure reported by the connection adapter for one push.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The transport endpoint behind this connection id is gone.
    #[error("connection {0} is unreachable")]
    Unreachable(ConnectionId),
}

/// Failure of a publish call itself.
///
/// Per-subscriber delivery failures are not part of this: they are
/// converted into evictions and never surfaced to the publisher.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to encode wire message: {0}")]
    Encode(#[from] serde_json::Error),
}
