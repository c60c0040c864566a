//! # RideSub
//!
//! `ridesub` is the real-time subscription and publication fan-out service
//! of a ride-sharing backend. It sits behind a persistent WebSocket
//! gateway, tracks which live connections care about which logical topics,
//! and delivers create/update/delete/query events from the domain services
//! (journeys, chats, driver applications, …) to exactly the right set of
//! connections, evicting subscribers whose connection has gone stale.
//!
//! ## Core Modules
//!
//! - `registry`: topic membership: the topic model, the durable store
//!   seam, and the subscription registry with its subscribe/unsubscribe/
//!   lookup operations.
//! - `publish`: the publication engine that resolves subscribers and fans
//!   events out through the connection adapter, self-healing on delivery
//!   failure.
//! - `connection`: the push-to-connection boundary and the WebSocket
//!   connection table implementing it.
//! - `gateway`: the WebSocket server loop and the per-connection lifecycle
//!   handler.
//! - `config`: loading and merging server configuration.
//! - `persistence`: the sled-backed durable registry store.
//! - `utils`: shared definitions, such as the error taxonomy.

pub mod config;
pub mod connection;
pub mod gateway;
pub mod persistence;
pub mod publish;
pub mod registry;
pub mod utils;
