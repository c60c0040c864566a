use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use ridesub::config::load_config;
use ridesub::connection::WsConnections;
use ridesub::gateway::{start_gateway, LifecycleHandler};
use ridesub::persistence::SledRegistryStore;
use ridesub::publish::PublicationEngine;
use ridesub::registry::topic::TopicKey;
use ridesub::registry::SubscriptionRegistry;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = load_config().expect("Failed to load configuration");
    let addr = format!("{}:{}", settings.server.host, settings.server.port);

    let store = Arc::new(
        SledRegistryStore::open(&settings.registry.store_path)
            .expect("Failed to open registry store"),
    );
    let registry = Arc::new(SubscriptionRegistry::new(store));
    let connections = Arc::new(WsConnections::new());
    let publisher = Arc::new(PublicationEngine::new(registry.clone(), connections.clone()));

    let default_topic = settings
        .gateway
        .default_subscription
        .as_deref()
        .map(|name| TopicKey::collection(name, "connection"));
    let handler = Arc::new(LifecycleHandler::new(
        registry,
        publisher,
        connections.clone(),
        None,
        default_topic,
    ));

    start_gateway(&addr, connections, handler).await;
}
