use tempfile::tempdir;

use super::SledRegistryStore;
use crate::registry::store::RegistryStore;
use crate::registry::topic::{SubscriberEntry, TopicKey};

fn open_store(dir: &tempfile::TempDir) -> SledRegistryStore {
    SledRegistryStore::open(dir.path().to_str().unwrap()).expect("Failed to open sled store")
}

fn journey_topic() -> TopicKey {
    TopicKey::new("journeys", "journey", "j1")
}

#[tokio::test]
async fn get_on_missing_key_is_none() {
    let dir = tempdir().unwrap();
    let store = open_store(&dir);

    assert!(store.get(&journey_topic()).await.unwrap().is_none());
}

#[tokio::test]
async fn append_creates_record_and_preserves_order() {
    let dir = tempdir().unwrap();
    let store = open_store(&dir);
    let key = journey_topic();

    store
        .append_subscriber(&key, SubscriberEntry::new("conn-a", None))
        .await
        .unwrap();
    store
        .append_subscriber(&key, SubscriberEntry::new("conn-b", Some("user-1".to_string())))
        .await
        .unwrap();

    let record = store.get(&key).await.unwrap().unwrap();
    assert_eq!(record.key, key);
    assert_eq!(record.subscribers.len(), 2);
    assert_eq!(record.subscribers[0].connection_id, "conn-a");
    assert_eq!(record.subscribers[1].connection_id, "conn-b");
    assert_eq!(record.subscribers[1].user_id.as_deref(), Some("user-1"));
}

#[tokio::test]
async fn remove_at_drops_exactly_one_entry() {
    let dir = tempdir().unwrap();
    let store = open_store(&dir);
    let key = journey_topic();

    for id in ["conn-a", "conn-b", "conn-c"] {
        store
            .append_subscriber(&key, SubscriberEntry::new(id, None))
            .await
            .unwrap();
    }
    store.remove_subscriber_at(&key, 1).await.unwrap();

    let record = store.get(&key).await.unwrap().unwrap();
    let ids: Vec<&str> = record
        .subscribers
        .iter()
        .map(|entry| entry.connection_id.as_str())
        .collect();
    assert_eq!(ids, vec!["conn-a", "conn-c"]);
}

#[tokio::test]
async fn remove_at_out_of_bounds_is_a_noop() {
    let dir = tempdir().unwrap();
    let store = open_store(&dir);
    let key = journey_topic();

    store
        .append_subscriber(&key, SubscriberEntry::new("conn-a", None))
        .await
        .unwrap();
    store.remove_subscriber_at(&key, 5).await.unwrap();

    let record = store.get(&key).await.unwrap().unwrap();
    assert_eq!(record.subscribers.len(), 1);
}

#[tokio::test]
async fn remove_at_on_missing_key_is_a_noop() {
    let dir = tempdir().unwrap();
    let store = open_store(&dir);

    store
        .remove_subscriber_at(&journey_topic(), 0)
        .await
        .unwrap();
    assert!(store.get(&journey_topic()).await.unwrap().is_none());
}

#[tokio::test]
async fn distinct_topic_keys_do_not_collide() {
    let dir = tempdir().unwrap();
    let store = open_store(&dir);
    let instance = TopicKey::new("journeys", "journey", "j1");
    let collection = TopicKey::collection("journeys", "journey");

    store
        .append_subscriber(&instance, SubscriberEntry::new("conn-a", None))
        .await
        .unwrap();

    assert!(store.get(&collection).await.unwrap().is_none());
    assert_eq!(
        store
            .get(&instance)
            .await
            .unwrap()
            .unwrap()
            .subscribers
            .len(),
        1
    );
}
