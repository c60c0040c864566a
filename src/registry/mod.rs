//! The `registry` module owns topic membership: which live connections are
//! subscribed to which topic keys.
//!
//! It defines the topic data model, the durable store seam the registry
//! runs against, and the [`SubscriptionRegistry`] itself with its
//! subscribe/unsubscribe/lookup operations.

pub mod engine;
pub mod store;
pub mod topic;

pub use engine::SubscriptionRegistry;
pub use store::{MemoryRegistryStore, RegistryStore};

#[cfg(test)]
mod tests;
