//! Key-path store backed by a realtime database REST endpoint.
//!
//! Every path maps to `{database_url}/{path}.json`. Change subscriptions are
//! served by polling the path on a fixed interval.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::key_path_store::{
    error::KeyPathStoreError, path::StorePath, subscription::Subscription, ChangeCallback,
    KeyPathStore,
};


/// Polling faster than this only burns requests.
const MIN_POLL_INTERVAL: std::time::Duration = std::time::Duration::from_millis(50);

#[derive(Debug, Clone)]
pub struct Params {
    pub database_url: Url,
    pub auth_token: Option<String>,
    pub poll_interval: time::Duration,
}

pub struct RestKeyPathStore {
    client: reqwest::Client,
    params: Params,
}

#[derive(Deserialize)]
struct PushResponse {
    name: String,
}

impl RestKeyPathStore {
    pub fn new(client: reqwest::Client, params: Params) -> Self {
        Self { client, params }
    }

    fn url_for(&self, path: &StorePath) -> Result<Url, KeyPathStoreError> {
        let base = self.params.database_url.as_str().trim_end_matches('/');
        let encoded = path
            .segments()
            .iter()
            .map(|segment| urlencoding::encode(segment))
            .collect::<Vec<_>>()
            .join("/");

        let mut url = Url::parse(&format!("{base}/{encoded}.json"))
            .map_err(|e| KeyPathStoreError::InvalidPath(e.to_string()))?;

        if let Some(token) = &self.params.auth_token {
            url.query_pairs_mut().append_pair("auth", token);
        }

        Ok(url)
    }
}

#[async_trait]
impl KeyPathStore for RestKeyPathStore {
    async fn read(&self, path: &StorePath) -> Result<Option<Value>, KeyPathStoreError> {
        fetch(&self.client, self.url_for(path)?).await
    }

    async fn write(&self, path: &StorePath, value: Value) -> Result<(), KeyPathStoreError> {
        let request = self.client.put(self.url_for(path)?).json(&value);
        send(request).await?;

        Ok(())
    }

    async fn delete(&self, path: &StorePath) -> Result<(), KeyPathStoreError> {
        send(self.client.delete(self.url_for(path)?)).await?;

        Ok(())
    }

    async fn push(&self, path: &StorePath, value: Value) -> Result<String, KeyPathStoreError> {
        let response = send(self.client.post(self.url_for(path)?).json(&value)).await?;
        let pushed: PushResponse = response
            .json()
            .await
            .map_err(|e| KeyPathStoreError::InvalidValue(e.to_string()))?;

        Ok(pushed.name)
    }

    async fn subscribe(
        &self,
        path: &StorePath,
        on_change: ChangeCallback,
    ) -> Result<Subscription, KeyPathStoreError> {
        let url = self.url_for(path)?;
        let client = self.client.clone();
        let interval = self.params.poll_interval.unsigned_abs().max(MIN_POLL_INTERVAL);

        let mut last = fetch(&client, url.clone()).await?;
        on_change(last.clone());

        let watched = path.to_owned();
        let task = tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;

                match fetch(&client, url.clone()).await {
                    Ok(current) if current != last => {
                        debug!(path = %watched, "change detected");
                        on_change(current.clone());
                        last = current;
                    }
                    Ok(_) => {}
                    Err(error) => warn!(path = %watched, %error, "poll failed"),
                }
            }
        });

        Ok(Subscription::new(path.to_owned(), move || task.abort()))
    }
}

async fn send(request: reqwest::RequestBuilder) -> Result<reqwest::Response, KeyPathStoreError> {
    request
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(|e| KeyPathStoreError::Unavailable(e.to_string()))
}

async fn fetch(client: &reqwest::Client, url: Url) -> Result<Option<Value>, KeyPathStoreError> {
    let value: Value = send(client.get(url))
        .await?
        .json()
        .await
        .map_err(|e| KeyPathStoreError::InvalidValue(e.to_string()))?;

    Ok(Some(value).filter(|value| !value.is_null()))
}
