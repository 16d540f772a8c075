//! Farm-scoped chicken aggregation.
//!
//! Works out which farms a caller may read, fetches each farm's chickens,
//! merges them into one collection keyed by `(farm_id, chicken_id)` and offers
//! the single-chicken mutations.

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::{
    chicken::{
        error::ChickenProviderError,
        model::{AccessIdentity, AccessibleFarms, ChickenChangeCallback, ChickenFetch},
    },
    common_models::{
        chicken::{Chicken, ChickenId},
        farm::FarmId,
    },
    key_path_store::subscription::Subscription,
};

pub mod error;
pub mod imp;
pub mod model;
pub mod sort;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait ChickenProvider: Send + Sync {
    /// Farms the identity may read chickens from.
    ///
    /// Guest resolution denials do not fail: they yield an empty set with the
    /// reason recorded in [`AccessibleFarms::denial`].
    async fn list_accessible_farms(
        &self,
        identity: &AccessIdentity,
    ) -> Result<AccessibleFarms, ChickenProviderError>;

    /// Fetches and merges the chickens of every farm in `farm_ids`.
    ///
    /// A farm whose read fails is reported in [`ChickenFetch::failures`]; the
    /// other farms still contribute their records.
    async fn fetch_chickens_for_farms(&self, farm_ids: &BTreeSet<FarmId>) -> ChickenFetch;

    async fn get_chicken(
        &self,
        farm_id: &FarmId,
        chicken_id: &ChickenId,
    ) -> Result<Chicken, ChickenProviderError>;

    async fn add_chicken(
        &self,
        farm_id: &FarmId,
        chicken: Chicken,
    ) -> Result<ChickenId, ChickenProviderError>;

    async fn update_chicken(
        &self,
        farm_id: &FarmId,
        chicken_id: &ChickenId,
        chicken: Chicken,
    ) -> Result<(), ChickenProviderError>;

    async fn delete_chicken(
        &self,
        farm_id: &FarmId,
        chicken_id: &ChickenId,
    ) -> Result<(), ChickenProviderError>;

    /// Live view of one farm's chickens.
    async fn subscribe_chickens(
        &self,
        farm_id: &FarmId,
        on_change: ChickenChangeCallback,
    ) -> Result<Subscription, ChickenProviderError>;
}
