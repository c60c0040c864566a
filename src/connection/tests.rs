use tokio::sync::mpsc;
use tungstenite::protocol::Message as WsMessage;

use super::{ConnectionAdapter, WsConnections};
use crate::utils::error::DeliveryError;

#[tokio::test]
async fn push_reaches_registered_connection() {
    let connections = WsConnections::new();
    let (tx, mut rx) = mpsc::unbounded_channel::<WsMessage>();
    connections.register("conn-a", tx);

    connections
        .push("conn-a", "hello".to_string())
        .await
        .unwrap();

    let msg = rx.try_recv().unwrap();
    assert_eq!(msg.to_text().unwrap(), "hello");
}

#[tokio::test]
async fn push_to_unknown_connection_is_unreachable() {
    let connections = WsConnections::new();

    let err = connections
        .push("conn-missing", "hello".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, DeliveryError::Unreachable(id) if id == "conn-missing"));
}

#[tokio::test]
async fn push_after_receiver_dropped_is_unreachable() {
    let connections = WsConnections::new();
    let (tx, rx) = mpsc::unbounded_channel::<WsMessage>();
    connections.register("conn-a", tx);
    drop(rx);

    let err = connections
        .push("conn-a", "hello".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, DeliveryError::Unreachable(_)));
}

#[tokio::test]
async fn deregister_removes_connection() {
    let connections = WsConnections::new();
    let (tx, _rx) = mpsc::unbounded_channel::<WsMessage>();
    connections.register("conn-a", tx);
    assert!(connections.contains("conn-a"));

    connections.deregister("conn-a");
    assert!(!connections.contains("conn-a"));
}
