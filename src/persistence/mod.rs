//! The `persistence` module provides the durable registry store.
//!
//! It uses `sled` as an embedded key-value store so topic membership
//! survives process restarts.

pub mod sled_store;

pub use sled_store::SledRegistryStore;

#[cfg(test)]
mod tests;
