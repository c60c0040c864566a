use std::sync::Arc;

use super::store::{MemoryRegistryStore, RegistryStore};
use super::topic::TopicKey;
use super::SubscriptionRegistry;

fn registry() -> (Arc<MemoryRegistryStore>, SubscriptionRegistry) {
    let store = Arc::new(MemoryRegistryStore::new());
    let registry = SubscriptionRegistry::new(store.clone());
    (store, registry)
}

fn journey_topic() -> TopicKey {
    TopicKey::new("journeys", "journey", "j1")
}

#[tokio::test]
async fn subscribe_creates_topic_record_lazily() {
    let (store, registry) = registry();
    let key = journey_topic();

    assert!(store.get(&key).await.unwrap().is_none());
    registry.subscribe(&key, "conn-a", None).await.unwrap();

    let record = store.get(&key).await.unwrap().unwrap();
    assert_eq!(record.key, key);
    assert_eq!(record.subscribers.len(), 1);
    assert_eq!(record.subscribers[0].connection_id, "conn-a");
}

#[tokio::test]
async fn subscribe_twice_is_idempotent() {
    let (_, registry) = registry();
    let key = journey_topic();

    registry
        .subscribe(&key, "conn-a", Some("user-1".to_string()))
        .await
        .unwrap();
    registry
        .subscribe(&key, "conn-a", Some("user-1".to_string()))
        .await
        .unwrap();

    let subscribers = registry.get_subscribers(&key).await.unwrap();
    assert_eq!(subscribers.len(), 1);
    assert_eq!(subscribers[0].connection_id, "conn-a");
    assert_eq!(subscribers[0].user_id.as_deref(), Some("user-1"));
}

#[tokio::test]
async fn concurrent_subscribes_both_land() {
    let (_, registry) = registry();
    let key = journey_topic();

    let (a, b) = tokio::join!(
        registry.subscribe(&key, "conn-a", None),
        registry.subscribe(&key, "conn-b", None),
    );
    a.unwrap();
    b.unwrap();

    let subscribers = registry.get_subscribers(&key).await.unwrap();
    let ids: Vec<&str> = subscribers
        .iter()
        .map(|entry| entry.connection_id.as_str())
        .collect();
    assert_eq!(subscribers.len(), 2);
    assert!(ids.contains(&"conn-a"));
    assert!(ids.contains(&"conn-b"));
}

#[tokio::test]
async fn unsubscribe_removes_only_matching_entry() {
    let (_, registry) = registry();
    let key = journey_topic();

    registry.subscribe(&key, "conn-a", None).await.unwrap();
    registry.subscribe(&key, "conn-b", None).await.unwrap();
    registry.subscribe(&key, "conn-c", None).await.unwrap();

    registry.unsubscribe(&key, "conn-b").await.unwrap();

    let subscribers = registry.get_subscribers(&key).await.unwrap();
    let ids: Vec<&str> = subscribers
        .iter()
        .map(|entry| entry.connection_id.as_str())
        .collect();
    assert_eq!(ids, vec!["conn-a", "conn-c"]);
}

#[tokio::test]
async fn concurrent_unsubscribes_both_remove() {
    let (_, registry) = registry();
    let key = journey_topic();

    registry.subscribe(&key, "conn-a", None).await.unwrap();
    registry.subscribe(&key, "conn-b", None).await.unwrap();

    // Removals on one key are serialized; neither may compute its index
    // against a snapshot the other has already shifted.
    let (a, b) = tokio::join!(
        registry.unsubscribe(&key, "conn-a"),
        registry.unsubscribe(&key, "conn-b"),
    );
    a.unwrap();
    b.unwrap();

    assert!(registry.get_subscribers(&key).await.unwrap().is_empty());
}

#[tokio::test]
async fn unsubscribe_unknown_topic_is_a_noop() {
    let (store, registry) = registry();
    let key = TopicKey::new("never-seen", "journey", "j9");

    registry.unsubscribe(&key, "conn-a").await.unwrap();

    // Must not create a record as a side effect.
    assert!(store.get(&key).await.unwrap().is_none());
    assert_eq!(store.record_count().await, 0);
}

#[tokio::test]
async fn unsubscribe_absent_connection_is_a_noop() {
    let (_, registry) = registry();
    let key = journey_topic();

    registry.subscribe(&key, "conn-a", None).await.unwrap();
    registry.unsubscribe(&key, "conn-zzz").await.unwrap();

    let subscribers = registry.get_subscribers(&key).await.unwrap();
    assert_eq!(subscribers.len(), 1);
}

#[tokio::test]
async fn emptied_record_persists() {
    let (store, registry) = registry();
    let key = journey_topic();

    registry.subscribe(&key, "conn-a", None).await.unwrap();
    registry.unsubscribe(&key, "conn-a").await.unwrap();

    let record = store.get(&key).await.unwrap().unwrap();
    assert!(record.subscribers.is_empty());
    assert_eq!(store.record_count().await, 1);
}

#[tokio::test]
async fn get_subscribers_on_missing_topic_is_empty() {
    let (_, registry) = registry();
    let key = TopicKey::collection("driver-applications", "driverApplication");

    let subscribers = registry.get_subscribers(&key).await.unwrap();
    assert!(subscribers.is_empty());
}
