use coop_providers::chicken::sort::SortKey;
use serde::{Deserialize, Deserializer};
use url::Url;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CoopCoreConfig {
    pub store_config: StoreConfig,
    pub chicken_config: ChickenConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreConfig {
    /// Root of the realtime database REST endpoint. Required by
    /// [`crate::CoopCore::connect`].
    pub database_url: Option<Url>,
    pub auth_token: Option<String>,
    #[serde(rename = "pollIntervalMs", deserialize_with = "duration_from_millis")]
    pub poll_interval: time::Duration,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChickenConfig {
    pub page_size: usize,
    pub default_sort_key: SortKey,
    pub ascending: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            auth_token: None,
            poll_interval: time::Duration::seconds(5),
        }
    }
}

impl Default for ChickenConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            default_sort_key: SortKey::Name,
            ascending: true,
        }
    }
}

fn duration_from_millis<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<time::Duration, D::Error> {
    let millis = u32::deserialize(deserializer)?;
    if millis == 0 {
        return Err(serde::de::Error::custom("poll interval must be positive"));
    }
    Ok(time::Duration::milliseconds(millis.into()))
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = CoopCoreConfig::default();

        assert_eq!(config.chicken_config.page_size, 10);
        assert_eq!(config.chicken_config.default_sort_key, SortKey::Name);
        assert!(config.store_config.database_url.is_none());
        assert_eq!(config.store_config.poll_interval, time::Duration::seconds(5));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: CoopCoreConfig = serde_json::from_value(json!({
            "storeConfig": {
                "databaseUrl": "https://coop-default-rtdb.example.com",
                "pollIntervalMs": 250
            },
            "chickenConfig": {"defaultSortKey": "currentWeight"}
        }))
        .unwrap();

        assert_eq!(
            config.store_config.database_url.unwrap().as_str(),
            "https://coop-default-rtdb.example.com/"
        );
        assert_eq!(
            config.store_config.poll_interval,
            time::Duration::milliseconds(250)
        );
        assert_eq!(config.chicken_config.page_size, 10);
        assert_eq!(
            config.chicken_config.default_sort_key,
            SortKey::CurrentWeight
        );
    }

    #[test]
    fn test_zero_poll_interval_is_rejected() {
        let result = serde_json::from_value::<CoopCoreConfig>(json!({
            "storeConfig": {"pollIntervalMs": 0}
        }));

        assert!(result.is_err());
    }
}
