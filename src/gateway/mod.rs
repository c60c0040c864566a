//! The `gateway` module bridges the WebSocket transport and the
//! subscription registry: it accepts connections, routes inbound
//! subscribe/unsubscribe requests, replies to unroutable or malformed
//! messages, and cleans up membership on disconnect.

pub mod handler;
pub mod message;
pub mod websocket;

pub use handler::{ConnectionState, LifecycleHandler, SnapshotProvider};
pub use websocket::start_gateway;
