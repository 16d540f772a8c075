use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use super::InMemoryKeyPathStore;
use crate::key_path_store::{path::StorePath, KeyPathStore};

fn path(value: &str) -> StorePath {
    StorePath::parse(value).unwrap()
}

fn recorder() -> (Arc<Mutex<Vec<Option<Value>>>>, crate::key_path_store::ChangeCallback) {
    let seen = Arc::new(Mutex::new(vec![]));
    let sink = seen.clone();
    (
        seen,
        Box::new(move |value| sink.lock().unwrap().push(value)),
    )
}

#[tokio::test]
async fn test_read_absent_path_is_none() {
    let store = InMemoryKeyPathStore::default();

    assert_eq!(store.read(&path("farms/f1")).await.unwrap(), None);
    assert_eq!(store.read(&StorePath::root()).await.unwrap(), None);
}

#[tokio::test]
async fn test_write_then_read_nested() {
    let store = InMemoryKeyPathStore::default();

    store
        .write(&path("chickens/f1/c1"), json!({"name": "Henrietta"}))
        .await
        .unwrap();

    assert_eq!(
        store.read(&path("chickens/f1")).await.unwrap(),
        Some(json!({"c1": {"name": "Henrietta"}}))
    );
    assert_eq!(
        store.read(&path("chickens/f1/c1/name")).await.unwrap(),
        Some(json!("Henrietta"))
    );
}

#[tokio::test]
async fn test_delete_prunes_empty_parents() {
    let store = InMemoryKeyPathStore::new(json!({
        "chickens": {"f1": {"c1": {"name": "Henrietta"}}},
        "farms": {"f1": {"name": "Sunny Acres"}}
    }));

    store.delete(&path("chickens/f1/c1")).await.unwrap();

    assert_eq!(store.read(&path("chickens/f1")).await.unwrap(), None);
    assert_eq!(store.read(&path("chickens")).await.unwrap(), None);
    assert_eq!(
        store.snapshot().await,
        json!({"farms": {"f1": {"name": "Sunny Acres"}}})
    );
}

#[tokio::test]
async fn test_write_over_scalar_replaces_it() {
    let store = InMemoryKeyPathStore::new(json!({"users": {"u1": {"farms": true}}}));

    store
        .write(&path("users/u1/farms/f1"), json!(true))
        .await
        .unwrap();

    assert_eq!(
        store.read(&path("users/u1/farms")).await.unwrap(),
        Some(json!({"f1": true}))
    );
}

#[tokio::test]
async fn test_push_generates_distinct_keys() {
    let store = InMemoryKeyPathStore::default();
    let chickens = path("chickens/f1");

    let first = store.push(&chickens, json!({"name": "A"})).await.unwrap();
    let second = store.push(&chickens, json!({"name": "B"})).await.unwrap();

    assert_ne!(first, second);
    let value = store.read(&chickens).await.unwrap().unwrap();
    assert_eq!(value[&first], json!({"name": "A"}));
    assert_eq!(value[&second], json!({"name": "B"}));
}

#[tokio::test]
async fn test_subscribe_emits_current_value_and_changes() {
    let store = InMemoryKeyPathStore::new(json!({"chickens": {"f1": {"c1": {"name": "A"}}}}));
    let (seen, callback) = recorder();

    let _subscription = store.subscribe(&path("chickens/f1"), callback).await.unwrap();

    store
        .write(&path("chickens/f1/c2"), json!({"name": "B"}))
        .await
        .unwrap();
    store
        .write(&path("chickens/f2/c1"), json!({"name": "elsewhere"}))
        .await
        .unwrap();
    store.delete(&path("chickens")).await.unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            Some(json!({"c1": {"name": "A"}})),
            Some(json!({"c1": {"name": "A"}, "c2": {"name": "B"}})),
            None,
        ]
    );
}

#[tokio::test]
async fn test_dropped_subscription_stops_notifications() {
    let store = InMemoryKeyPathStore::default();
    let (seen, callback) = recorder();

    let subscription = store.subscribe(&path("farms"), callback).await.unwrap();
    store.write(&path("farms/f1"), json!({"name": "X"})).await.unwrap();
    drop(subscription);
    store.write(&path("farms/f2"), json!({"name": "Y"})).await.unwrap();

    assert_eq!(seen.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_callback_may_write_back_into_store() {
    let store = Arc::new(InMemoryKeyPathStore::default());
    let writer = store.clone();

    let _subscription = store
        .subscribe(
            &path("farms/f1"),
            Box::new(move |value| {
                if value.is_some() {
                    let writer = writer.clone();
                    tokio::spawn(async move {
                        writer
                            .write(&path("audit/f1"), json!(true))
                            .await
                            .unwrap();
                    });
                }
            }),
        )
        .await
        .unwrap();

    store.write(&path("farms/f1"), json!({"name": "X"})).await.unwrap();
    for _ in 0..10 {
        if store.read(&path("audit/f1")).await.unwrap().is_some() {
            break;
        }
        tokio::task::yield_now().await;
    }

    assert_eq!(store.read(&path("audit/f1")).await.unwrap(), Some(json!(true)));
}
