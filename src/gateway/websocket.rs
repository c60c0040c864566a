use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::accept_async;
use tracing::{debug, info, warn};
use tungstenite::protocol::Message as WsMessage;

use crate::connection::WsConnections;
use crate::gateway::handler::LifecycleHandler;

/// Accepts WebSocket connections and drives the lifecycle handler for each.
///
/// One task per connection reads inbound frames; a second task pumps the
/// connection's outbound channel into the socket sink, so pushes from the
/// publication engine never block the read loop.
pub async fn start_gateway(
    addr: &str,
    connections: Arc<WsConnections>,
    handler: Arc<LifecycleHandler>,
) {
    let listener = TcpListener::bind(addr).await.expect("Can't bind");
    info!("gateway listening on ws://{addr}");

    while let Ok((stream, _)) = listener.accept().await {
        let connections = connections.clone();
        let handler = handler.clone();
        let connection_id = format!("conn-{}", uuid::Uuid::new_v4());

        tokio::spawn(async move {
            let ws_stream = match accept_async(stream).await {
                Ok(ws) => ws,
                Err(err) => {
                    warn!(%err, "WebSocket handshake failed");
                    return;
                }
            };
            let (mut ws_sender, mut ws_receiver) = ws_stream.split();

            let (tx, mut rx) = mpsc::unbounded_channel::<WsMessage>();
            connections.register(&connection_id, tx);
            handler.on_connect(&connection_id).await;

            let outbound_id = connection_id.clone();
            tokio::spawn(async move {
                while let Some(msg) = rx.recv().await {
                    if ws_sender.send(msg).await.is_err() {
                        break;
                    }
                }
                debug!(connection = %outbound_id, "send loop closed");
            });

            while let Some(Ok(msg)) = ws_receiver.next().await {
                if msg.is_text() {
                    if let Ok(text) = msg.to_text() {
                        handler.on_message(&connection_id, text).await;
                    }
                }
            }

            handler.on_disconnect(&connection_id).await;
            connections.deregister(&connection_id);
        });
    }
}
