use std::sync::Arc;

use serde_json::{json, Value};
use time::macros::datetime;

use super::StoreFarmProvider;
use crate::{
    common_models::{farm::FarmId, user::UserId},
    farm::{error::FarmProviderError, FarmProvider},
    key_path_store::imp::in_memory::InMemoryKeyPathStore,
};

fn create_provider(data: Value) -> StoreFarmProvider {
    StoreFarmProvider::new(Arc::new(InMemoryKeyPathStore::new(data)))
}

#[tokio::test]
async fn test_get_farm_maps_document() {
    let provider = create_provider(json!({
        "farms": {
            "f1": {
                "name": "Sunny Acres",
                "type": "Layer",
                "size": 40,
                "imageUrl": "https://img.example/f1.png",
                "location": {"address": "1 Coop Lane", "city": "Henley"},
                "guestAccess": {
                    "g1": {"token": "abc", "expiresAt": "2999-01-01T00:00:00Z"},
                    "g2": {"token": "broken"}
                }
            }
        }
    }));

    let farm = provider.get_farm(&FarmId::from("f1")).await.unwrap();

    assert_eq!(farm.name.as_deref(), Some("Sunny Acres"));
    assert_eq!(farm.farm_type.as_deref(), Some("Layer"));
    assert_eq!(farm.size.as_deref(), Some("40"));
    assert_eq!(
        farm.location.and_then(|location| location.city).as_deref(),
        Some("Henley")
    );
    assert_eq!(farm.guest_access.len(), 1);
    assert_eq!(farm.guest_access[0].token.as_str(), "abc");
    assert_eq!(
        farm.guest_access[0].expires_at,
        datetime!(2999-01-01 00:00 UTC)
    );
}

#[tokio::test]
async fn test_get_farm_not_found() {
    let provider = create_provider(Value::Null);

    let result = provider.get_farm(&FarmId::from("f1")).await;

    assert_eq!(result, Err(FarmProviderError::NotFound(FarmId::from("f1"))));
}

#[tokio::test]
async fn test_list_user_farms_skips_dangling_index_entries() {
    let provider = create_provider(json!({
        "users": {"u1": {"farms": {"f2": true, "f1": true, "gone": true, "off": false}}},
        "farms": {
            "f1": {"name": "One"},
            "f2": {"name": "Two"},
            "off": {"name": "Not a member"},
            "other": {"name": "Someone else's"}
        }
    }));

    let farms = provider.list_user_farms(&UserId::from("u1")).await.unwrap();

    let names: Vec<_> = farms.iter().map(|farm| farm.name.as_deref()).collect();
    assert_eq!(names, vec![Some("One"), Some("Two")]);
}

#[tokio::test]
async fn test_list_user_farms_without_index() {
    let provider = create_provider(json!({"farms": {"f1": {"name": "One"}}}));

    let farms = provider.list_user_farms(&UserId::from("u1")).await.unwrap();

    assert!(farms.is_empty());
}

#[tokio::test]
async fn test_array_shaped_grants_and_index() {
    let provider = create_provider(json!({
        "users": {"u1": {"farms": [null, true]}},
        "farms": [
            null,
            {
                "name": "Meadow",
                "guestAccess": [null, {"token": "abc", "expiresAt": "2999-01-01T00:00:00Z"}]
            }
        ]
    }));

    let farms = provider.list_user_farms(&UserId::from("u1")).await.unwrap();

    assert_eq!(farms.len(), 1);
    assert_eq!(farms[0].id, FarmId::from("1"));
    assert_eq!(farms[0].guest_access.len(), 1);
    assert_eq!(farms[0].guest_access[0].id.as_str(), "1");
}
