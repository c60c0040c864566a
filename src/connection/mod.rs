//! The `connection` module defines the boundary for pushing data to a
//! specific persistent connection, and the WebSocket-backed connection
//! table implementing it.

pub mod adapter;

pub use adapter::{ConnectionAdapter, WsConnections};

#[cfg(test)]
mod tests;
