use std::sync::Arc;

use coop_providers::{
    common_models::{
        farm::{Farm, FarmId},
        user::UserId,
    },
    farm::{error::FarmProviderError, FarmProvider},
};

pub struct FarmService {
    pub farm_provider: Arc<dyn FarmProvider>,
}

impl FarmService {
    pub fn new(farm_provider: Arc<dyn FarmProvider>) -> Self {
        Self { farm_provider }
    }

    pub async fn list_farms(&self, user_id: &UserId) -> Result<Vec<Farm>, FarmProviderError> {
        self.farm_provider.list_user_farms(user_id).await
    }

    pub async fn get_farm(&self, farm_id: &FarmId) -> Result<Farm, FarmProviderError> {
        self.farm_provider.get_farm(farm_id).await
    }
}
