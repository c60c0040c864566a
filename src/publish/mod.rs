//! The `publish` module turns a domain mutation into targeted deliveries:
//! it resolves the current subscribers of a topic and fans the event out
//! through the connection adapter, evicting subscribers whose connection
//! has gone stale.

pub mod engine;
pub mod event;

pub use engine::PublicationEngine;
pub use event::{EventKind, PublicationPayload, WireMessage};
