//! Farm lookups for owners.

use async_trait::async_trait;

use crate::{
    common_models::{
        farm::{Farm, FarmId},
        user::UserId,
    },
    farm::error::FarmProviderError,
};

pub mod error;
pub mod imp;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait FarmProvider: Send + Sync {
    async fn get_farm(&self, farm_id: &FarmId) -> Result<Farm, FarmProviderError>;

    /// Farms in the user's index that still exist, in farm-id order.
    async fn list_user_farms(&self, user_id: &UserId) -> Result<Vec<Farm>, FarmProviderError>;
}
