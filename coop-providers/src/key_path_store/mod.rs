//! The hierarchical key-path store acting as the system of record.
//!
//! Values are JSON documents addressed by slash-delimited paths. The store
//! offers point reads and writes plus path-scoped change subscriptions. It
//! provides no transactions and no compare-and-swap: concurrent writers race
//! and the last write wins.

use async_trait::async_trait;
use serde_json::Value;

use crate::key_path_store::{error::KeyPathStoreError, path::StorePath, subscription::Subscription};

pub mod error;
pub mod imp;
pub mod path;
pub mod subscription;

/// Callback invoked with the value at a subscribed path. `None` means absent.
pub type ChangeCallback = Box<dyn Fn(Option<Value>) + Send + Sync>;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait KeyPathStore: Send + Sync {
    /// Point read. An absent node is `Ok(None)`.
    async fn read(&self, path: &StorePath) -> Result<Option<Value>, KeyPathStoreError>;

    /// Replaces the node at `path`. Writing `null` removes it.
    async fn write(&self, path: &StorePath, value: Value) -> Result<(), KeyPathStoreError>;

    async fn delete(&self, path: &StorePath) -> Result<(), KeyPathStoreError>;

    /// Adds a child under `path` with a store-generated key and returns the key.
    async fn push(&self, path: &StorePath, value: Value) -> Result<String, KeyPathStoreError>;

    /// Registers `on_change` for `path`.
    ///
    /// The callback fires once with the current value and then after every
    /// change touching the path, its ancestors or its descendants. The
    /// registration lives as long as the returned [`Subscription`].
    async fn subscribe(
        &self,
        path: &StorePath,
        on_change: ChangeCallback,
    ) -> Result<Subscription, KeyPathStoreError>;
}
