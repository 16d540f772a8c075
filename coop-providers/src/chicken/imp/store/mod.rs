//! Chicken provider reading and writing the key-path store directly.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{debug, warn};

use crate::{
    chicken::{
        error::ChickenProviderError,
        model::{
            AccessIdentity, AccessibleFarms, ChickenChangeCallback, ChickenFetch,
            DenialReason, FarmFetchFailure,
        },
        ChickenProvider,
    },
    common_models::{
        chicken::{Chicken, ChickenId},
        farm::FarmId,
    },
    guest_access::GuestAccessResolver,
    key_path_store::{path::StorePath, subscription::Subscription, KeyPathStore},
};

pub(crate) mod mapper;

#[cfg(test)]
mod test;

pub struct StoreChickenProvider {
    store: Arc<dyn KeyPathStore>,
    guest_resolver: Arc<dyn GuestAccessResolver>,
}

impl StoreChickenProvider {
    pub fn new(store: Arc<dyn KeyPathStore>, guest_resolver: Arc<dyn GuestAccessResolver>) -> Self {
        Self {
            store,
            guest_resolver,
        }
    }
}

#[async_trait]
impl ChickenProvider for StoreChickenProvider {
    async fn list_accessible_farms(
        &self,
        identity: &AccessIdentity,
    ) -> Result<AccessibleFarms, ChickenProviderError> {
        match identity {
            AccessIdentity::Owner(user_id) => {
                let index = self.store.read(&StorePath::user_farms(user_id)?).await?;
                let farms = mapper::farm_ids_from_index(index);
                debug!(%user_id, count = farms.len(), "owner farms listed");

                Ok(AccessibleFarms {
                    farms,
                    denial: None,
                })
            }
            AccessIdentity::Guest(token) => {
                match self.guest_resolver.resolve_guest_token(token).await {
                    Ok(farm_id) => Ok(AccessibleFarms {
                        farms: BTreeSet::from([farm_id]),
                        denial: None,
                    }),
                    Err(error) => {
                        let reason = DenialReason::try_from(error)?;
                        debug!(%reason, "guest access denied, no farms accessible");

                        Ok(AccessibleFarms::denied(reason))
                    }
                }
            }
        }
    }

    async fn fetch_chickens_for_farms(&self, farm_ids: &BTreeSet<FarmId>) -> ChickenFetch {
        let reads = farm_ids.iter().map(|farm_id| async move {
            let result = match StorePath::chickens(farm_id) {
                Ok(path) => self.store.read(&path).await,
                Err(error) => Err(error),
            };
            (farm_id, result)
        });

        // join_all keeps input order, so the merge is in farm-id order
        let mut fetch = ChickenFetch::default();
        for (farm_id, result) in join_all(reads).await {
            match result {
                Ok(value) => fetch
                    .chickens
                    .extend(mapper::chickens_from_snapshot(farm_id, value)),
                Err(error) => {
                    warn!(%farm_id, %error, "chicken fetch failed");
                    fetch.failures.push(FarmFetchFailure {
                        farm_id: farm_id.to_owned(),
                        error: error.into(),
                    });
                }
            }
        }

        debug!(
            farms = farm_ids.len(),
            chickens = fetch.chickens.len(),
            failures = fetch.failures.len(),
            "chickens fetched"
        );
        fetch
    }

    async fn get_chicken(
        &self,
        farm_id: &FarmId,
        chicken_id: &ChickenId,
    ) -> Result<Chicken, ChickenProviderError> {
        let value = self
            .store
            .read(&StorePath::chicken(farm_id, chicken_id)?)
            .await?
            .ok_or_else(|| ChickenProviderError::NotFound {
                farm_id: farm_id.to_owned(),
                chicken_id: chicken_id.to_owned(),
            })?;

        Ok(serde_json::from_value(value)?)
    }

    async fn add_chicken(
        &self,
        farm_id: &FarmId,
        chicken: Chicken,
    ) -> Result<ChickenId, ChickenProviderError> {
        let value = serde_json::to_value(&chicken)?;
        let key = self.store.push(&StorePath::chickens(farm_id)?, value).await?;

        Ok(ChickenId::from(key))
    }

    async fn update_chicken(
        &self,
        farm_id: &FarmId,
        chicken_id: &ChickenId,
        chicken: Chicken,
    ) -> Result<(), ChickenProviderError> {
        let value = serde_json::to_value(&chicken)?;
        self.store
            .write(&StorePath::chicken(farm_id, chicken_id)?, value)
            .await?;

        Ok(())
    }

    async fn delete_chicken(
        &self,
        farm_id: &FarmId,
        chicken_id: &ChickenId,
    ) -> Result<(), ChickenProviderError> {
        self.store
            .delete(&StorePath::chicken(farm_id, chicken_id)?)
            .await?;

        Ok(())
    }

    async fn subscribe_chickens(
        &self,
        farm_id: &FarmId,
        on_change: ChickenChangeCallback,
    ) -> Result<Subscription, ChickenProviderError> {
        let path = StorePath::chickens(farm_id)?;
        let farm_id = farm_id.to_owned();

        let subscription = self
            .store
            .subscribe(
                &path,
                Box::new(move |value| {
                    on_change(mapper::chickens_from_snapshot(&farm_id, value))
                }),
            )
            .await?;

        Ok(subscription)
    }
}
