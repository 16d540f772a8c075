use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use maplit::btreeset;
use mockall::predicate;
use serde_json::{json, Value};

use super::StoreChickenProvider;
use crate::{
    chicken::{
        error::ChickenProviderError,
        model::{AccessIdentity, DenialReason},
        ChickenProvider,
    },
    common_models::{
        chicken::{Chicken, ChickenId},
        farm::FarmId,
        guest::GuestToken,
        user::UserId,
    },
    guest_access::{error::GuestAccessError, MockGuestAccessResolver},
    key_path_store::{
        error::KeyPathStoreError, imp::in_memory::InMemoryKeyPathStore, path::StorePath,
        KeyPathStore, MockKeyPathStore,
    },
};

fn farm(id: &str) -> FarmId {
    FarmId::from(id)
}

fn owner(id: &str) -> AccessIdentity {
    AccessIdentity::Owner(UserId::from(id))
}

fn guest(token: &str) -> AccessIdentity {
    AccessIdentity::Guest(GuestToken::from(token))
}

fn create_provider(data: Value) -> (StoreChickenProvider, Arc<InMemoryKeyPathStore>) {
    let store = Arc::new(InMemoryKeyPathStore::new(data));
    let provider = StoreChickenProvider::new(store.clone(), Arc::new(MockGuestAccessResolver::new()));
    (provider, store)
}

fn resolver_returning(result: Result<FarmId, GuestAccessError>) -> MockGuestAccessResolver {
    let mut resolver = MockGuestAccessResolver::new();
    resolver
        .expect_resolve_guest_token()
        .once()
        .returning(move |_| result.clone());
    resolver
}

#[tokio::test]
async fn test_owner_farms_are_truthy_index_keys() {
    let (provider, _) = create_provider(json!({
        "users": {"u1": {"farms": {"f1": true, "f2": false, "f3": 1, "f4": ""}}}
    }));

    let result = provider.list_accessible_farms(&owner("u1")).await.unwrap();

    assert_eq!(result.farms, btreeset! {farm("f1"), farm("f3")});
    assert_eq!(result.denial, None);
}

#[tokio::test]
async fn test_owner_with_empty_index_has_no_farms() {
    let (provider, _) = create_provider(json!({"users": {"u1": {"farms": {}}}}));

    let result = provider.list_accessible_farms(&owner("u1")).await.unwrap();

    assert!(result.farms.is_empty());
    assert_eq!(result.denial, None);
}

#[tokio::test]
async fn test_guest_gets_resolved_farm() {
    let provider = StoreChickenProvider::new(
        Arc::new(InMemoryKeyPathStore::default()),
        Arc::new(resolver_returning(Ok(farm("f1")))),
    );

    let result = provider.list_accessible_farms(&guest("abc")).await.unwrap();

    assert_eq!(result.farms, btreeset! {farm("f1")});
}

#[tokio::test]
async fn test_guest_denial_degrades_to_empty_set() {
    for (error, reason) in [
        (GuestAccessError::UnknownToken, DenialReason::UnknownToken),
        (
            GuestAccessError::ExpiredGrant(farm("f1")),
            DenialReason::ExpiredGrant,
        ),
        (GuestAccessError::MissingToken, DenialReason::MissingToken),
    ] {
        let provider = StoreChickenProvider::new(
            Arc::new(InMemoryKeyPathStore::default()),
            Arc::new(resolver_returning(Err(error))),
        );

        let result = provider.list_accessible_farms(&guest("abc")).await.unwrap();

        assert!(result.farms.is_empty());
        assert_eq!(result.denial, Some(reason));
    }
}

#[tokio::test]
async fn test_guest_store_failure_is_an_error() {
    let provider = StoreChickenProvider::new(
        Arc::new(InMemoryKeyPathStore::default()),
        Arc::new(resolver_returning(Err(GuestAccessError::StoreUnavailable(
            KeyPathStoreError::Unavailable("offline".to_string()),
        )))),
    );

    let result = provider.list_accessible_farms(&guest("abc")).await;

    assert!(matches!(
        result,
        Err(ChickenProviderError::StoreUnavailable(_))
    ));
}

#[tokio::test]
async fn test_same_chicken_id_in_two_farms_is_kept_twice() {
    let (provider, _) = create_provider(json!({
        "chickens": {
            "A": {"1": {"name": "Henrietta"}},
            "B": {"1": {"name": "Clucky"}}
        }
    }));

    let fetch = provider
        .fetch_chickens_for_farms(&btreeset! {farm("A"), farm("B")})
        .await;

    assert!(fetch.failures.is_empty());
    let keys: Vec<_> = fetch
        .chickens
        .iter()
        .map(|r| (r.farm_id.as_str(), r.id.as_str(), r.chicken.name.as_deref()))
        .collect();
    assert_eq!(
        keys,
        vec![("A", "1", Some("Henrietta")), ("B", "1", Some("Clucky"))]
    );
}

#[tokio::test]
async fn test_farms_without_chickens_contribute_nothing() {
    let (provider, _) = create_provider(json!({
        "chickens": {"f1": {"c1": {"name": "Henrietta"}}}
    }));

    let fetch = provider
        .fetch_chickens_for_farms(&btreeset! {farm("f1"), farm("empty")})
        .await;

    assert_eq!(fetch.chickens.len(), 1);
    assert!(fetch.failures.is_empty());
}

#[tokio::test]
async fn test_no_farms_no_chickens() {
    let (provider, _) = create_provider(json!({"chickens": {"f1": {"c1": {}}}}));

    let fetch = provider.fetch_chickens_for_farms(&BTreeSet::new()).await;

    assert!(fetch.chickens.is_empty());
    assert!(fetch.failures.is_empty());
}

#[tokio::test]
async fn test_failing_farm_is_reported_without_aborting() {
    let mut store = MockKeyPathStore::new();
    store
        .expect_read()
        .with(predicate::eq(StorePath::parse("chickens/bad").unwrap()))
        .returning(|_| Err(KeyPathStoreError::Unavailable("timeout".to_string())));
    store
        .expect_read()
        .with(predicate::eq(StorePath::parse("chickens/good").unwrap()))
        .returning(|_| Ok(Some(json!({"c1": {"name": "Henrietta"}}))));

    let provider = StoreChickenProvider::new(Arc::new(store), Arc::new(MockGuestAccessResolver::new()));
    let fetch = provider
        .fetch_chickens_for_farms(&btreeset! {farm("bad"), farm("good")})
        .await;

    assert_eq!(fetch.chickens.len(), 1);
    assert_eq!(fetch.chickens[0].farm_id, farm("good"));
    assert_eq!(fetch.failures.len(), 1);
    assert_eq!(fetch.failures[0].farm_id, farm("bad"));
    assert_eq!(
        fetch.failures[0].error,
        ChickenProviderError::StoreUnavailable(KeyPathStoreError::Unavailable(
            "timeout".to_string()
        ))
    );
}

#[tokio::test]
async fn test_undecodable_records_are_skipped() {
    let (provider, _) = create_provider(json!({
        "chickens": {"f1": {"c1": {"name": "Henrietta"}, "c2": "corrupt", "c3": {"name": 5}}}
    }));

    let fetch = provider.fetch_chickens_for_farms(&btreeset! {farm("f1")}).await;

    assert_eq!(fetch.chickens.len(), 1);
    assert_eq!(fetch.chickens[0].id, ChickenId::from("c1"));
}

#[tokio::test]
async fn test_get_chicken_not_found() {
    let (provider, _) = create_provider(Value::Null);

    let result = provider
        .get_chicken(&farm("f1"), &ChickenId::from("c1"))
        .await;

    assert_eq!(
        result,
        Err(ChickenProviderError::NotFound {
            farm_id: farm("f1"),
            chicken_id: ChickenId::from("c1"),
        })
    );
}

#[tokio::test]
async fn test_add_update_delete_round() {
    let (provider, store) = create_provider(Value::Null);
    let f1 = farm("f1");

    let id = provider
        .add_chicken(
            &f1,
            Chicken {
                name: Some("Henrietta".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(
        store
            .read(&StorePath::chicken(&f1, &id).unwrap())
            .await
            .unwrap(),
        Some(json!({"name": "Henrietta"}))
    );

    provider
        .update_chicken(
            &f1,
            &id,
            Chicken {
                name: Some("Henrietta II".to_string()),
                egg_color: Some("brown".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let chicken = provider.get_chicken(&f1, &id).await.unwrap();
    assert_eq!(chicken.name.as_deref(), Some("Henrietta II"));
    assert_eq!(chicken.egg_color.as_deref(), Some("brown"));

    provider.delete_chicken(&f1, &id).await.unwrap();
    assert!(matches!(
        provider.get_chicken(&f1, &id).await,
        Err(ChickenProviderError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_mutation_failure_is_surfaced() {
    let mut store = MockKeyPathStore::new();
    store
        .expect_delete()
        .once()
        .returning(|_| Err(KeyPathStoreError::Unavailable("denied".to_string())));

    let provider = StoreChickenProvider::new(Arc::new(store), Arc::new(MockGuestAccessResolver::new()));
    let result = provider
        .delete_chicken(&farm("f1"), &ChickenId::from("c1"))
        .await;

    assert!(matches!(
        result,
        Err(ChickenProviderError::StoreUnavailable(_))
    ));
}

#[tokio::test]
async fn test_invalid_farm_id_is_rejected_before_touching_the_store() {
    let provider = StoreChickenProvider::new(
        Arc::new(MockKeyPathStore::new()),
        Arc::new(MockGuestAccessResolver::new()),
    );

    let result = provider
        .get_chicken(&farm("f1/../../users"), &ChickenId::from("c1"))
        .await;

    assert!(matches!(result, Err(ChickenProviderError::InvalidPath(_))));
}

#[tokio::test]
async fn test_subscription_delivers_tagged_records() {
    let (provider, store) = create_provider(json!({
        "chickens": {"f1": {"c1": {"name": "Henrietta"}}}
    }));
    let seen = Arc::new(Mutex::new(vec![]));
    let sink = seen.clone();

    let subscription = provider
        .subscribe_chickens(
            &farm("f1"),
            Box::new(move |records| sink.lock().unwrap().push(records.len())),
        )
        .await
        .unwrap();

    store
        .write(
            &StorePath::parse("chickens/f1/c2").unwrap(),
            json!({"name": "Clucky"}),
        )
        .await
        .unwrap();
    drop(subscription);
    store
        .delete(&StorePath::parse("chickens/f1/c1").unwrap())
        .await
        .unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
}

#[tokio::test]
async fn test_index_keyed_array_snapshots_are_read_like_maps() {
    let (provider, _) = create_provider(json!({
        "users": {"u1": {"farms": [null, true, false]}},
        "chickens": {
            "1": [null, {"name": "Henrietta"}],
            "2": {"1": {"name": "Clucky"}}
        }
    }));

    let access = provider.list_accessible_farms(&owner("u1")).await.unwrap();
    assert_eq!(access.farms, btreeset! {farm("1")});

    let fetched = provider
        .fetch_chickens_for_farms(&btreeset! {farm("1"), farm("2")})
        .await;

    assert!(fetched.failures.is_empty());
    let records: Vec<_> = fetched
        .chickens
        .iter()
        .map(|record| {
            (
                record.farm_id.as_str(),
                record.id.as_str(),
                record.chicken.name.as_deref(),
            )
        })
        .collect();
    assert_eq!(
        records,
        vec![("1", "1", Some("Henrietta")), ("2", "1", Some("Clucky"))]
    );
}
