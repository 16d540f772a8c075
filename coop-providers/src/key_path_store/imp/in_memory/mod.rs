//! In-memory key-path store holding one JSON tree.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::key_path_store::{
    error::KeyPathStoreError, path::StorePath, subscription::Subscription, ChangeCallback,
    KeyPathStore,
};

#[cfg(test)]
mod test;

type Listener = Arc<dyn Fn(Option<Value>) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: HashMap<u64, (StorePath, Listener)>,
}

pub struct InMemoryKeyPathStore {
    tree: Arc<Mutex<Value>>,
    listeners: Arc<std::sync::Mutex<Listeners>>,
}

impl InMemoryKeyPathStore {
    pub fn new(initial: Value) -> Self {
        Self {
            tree: Arc::new(Mutex::new(normalize(initial))),
            listeners: Default::default(),
        }
    }

    /// Copy of the whole tree.
    pub async fn snapshot(&self) -> Value {
        self.tree.lock().await.clone()
    }

    async fn apply(&self, path: &StorePath, value: Value) -> Result<(), KeyPathStoreError> {
        let notifications = {
            let mut tree = self.tree.lock().await;
            set_value(&mut tree, path.segments(), normalize(value));

            let listeners = self.lock_listeners()?;
            listeners
                .entries
                .values()
                .filter(|(listener_path, _)| listener_path.overlaps(path))
                .map(|(listener_path, listener)| {
                    (listener.clone(), value_at(&tree, listener_path))
                })
                .collect::<Vec<_>>()
        };

        // callbacks may write back into the store, so no lock is held here
        for (listener, value) in notifications {
            listener(value);
        }

        Ok(())
    }

    fn lock_listeners(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, Listeners>, KeyPathStoreError> {
        self.listeners
            .lock()
            .map_err(|_| KeyPathStoreError::Unavailable("listener registry poisoned".to_owned()))
    }
}

impl Default for InMemoryKeyPathStore {
    fn default() -> Self {
        Self::new(Value::Null)
    }
}

#[async_trait]
impl KeyPathStore for InMemoryKeyPathStore {
    async fn read(&self, path: &StorePath) -> Result<Option<Value>, KeyPathStoreError> {
        let tree = self.tree.lock().await;

        Ok(value_at(&tree, path))
    }

    async fn write(&self, path: &StorePath, value: Value) -> Result<(), KeyPathStoreError> {
        self.apply(path, value).await
    }

    async fn delete(&self, path: &StorePath) -> Result<(), KeyPathStoreError> {
        self.apply(path, Value::Null).await
    }

    async fn push(&self, path: &StorePath, value: Value) -> Result<String, KeyPathStoreError> {
        let key = Uuid::new_v4().simple().to_string();
        self.apply(&path.child(&key)?, value).await?;

        Ok(key)
    }

    async fn subscribe(
        &self,
        path: &StorePath,
        on_change: ChangeCallback,
    ) -> Result<Subscription, KeyPathStoreError> {
        let listener: Listener = Arc::from(on_change);

        let id = {
            let mut listeners = self.lock_listeners()?;
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners
                .entries
                .insert(id, (path.to_owned(), listener.clone()));
            id
        };

        let current = value_at(&*self.tree.lock().await, path);
        listener(current);

        let registry = Arc::downgrade(&self.listeners);
        Ok(Subscription::new(path.to_owned(), move || {
            if let Some(registry) = registry.upgrade() {
                if let Ok(mut listeners) = registry.lock() {
                    listeners.entries.remove(&id);
                }
            }
        }))
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Drops `null` and empty-object children; an empty result becomes `null`.
fn normalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let map: Map<String, Value> = map
                .into_iter()
                .map(|(key, value)| (key, normalize(value)))
                .filter(|(_, value)| !is_empty(value))
                .collect();

            if map.is_empty() {
                Value::Null
            } else {
                Value::Object(map)
            }
        }
        other => other,
    }
}

fn value_at(root: &Value, path: &StorePath) -> Option<Value> {
    path.segments()
        .iter()
        .try_fold(root, |node, segment| node.get(segment))
        .filter(|value| !is_empty(value))
        .cloned()
}

fn set_value(node: &mut Value, segments: &[String], value: Value) {
    let Some((head, rest)) = segments.split_first() else {
        *node = value;
        return;
    };

    if value.is_null() {
        if let Value::Object(map) = node {
            if let Some(child) = map.get_mut(head) {
                set_value(child, rest, Value::Null);
                if is_empty(child) {
                    map.remove(head);
                }
            }
        }
        return;
    }

    if !node.is_object() {
        *node = Value::Object(Map::new());
    }

    if let Value::Object(map) = node {
        let child = map.entry(head.to_owned()).or_insert(Value::Null);
        set_value(child, rest, value);
    }
}
