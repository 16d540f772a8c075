//! Farm provider reading the key-path store.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use crate::{
    chicken::imp::store::mapper::farm_ids_from_index,
    common_models::{
        farm::{Farm, FarmId},
        user::UserId,
    },
    farm::{error::FarmProviderError, FarmProvider},
    key_path_store::{path::StorePath, KeyPathStore},
    util::snapshot::children,
};

mod dto;

#[cfg(test)]
mod test;

use dto::FarmDTO;

pub struct StoreFarmProvider {
    store: Arc<dyn KeyPathStore>,
}

impl StoreFarmProvider {
    pub fn new(store: Arc<dyn KeyPathStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl FarmProvider for StoreFarmProvider {
    async fn get_farm(&self, farm_id: &FarmId) -> Result<Farm, FarmProviderError> {
        let value = self
            .store
            .read(&StorePath::farm(farm_id)?)
            .await?
            .ok_or_else(|| FarmProviderError::NotFound(farm_id.to_owned()))?;

        let dto: FarmDTO = serde_json::from_value(value)?;
        Ok(dto.into_farm(farm_id.to_owned()))
    }

    async fn list_user_farms(&self, user_id: &UserId) -> Result<Vec<Farm>, FarmProviderError> {
        let farm_ids = farm_ids_from_index(self.store.read(&StorePath::user_farms(user_id)?).await?);
        if farm_ids.is_empty() {
            return Ok(vec![]);
        }

        let Some(farms) = self.store.read(&StorePath::farms()).await?.and_then(children) else {
            return Ok(vec![]);
        };
        let mut farms: BTreeMap<String, Value> = farms.into_iter().collect();

        Ok(farm_ids
            .into_iter()
            .filter_map(|farm_id| {
                let value = farms.remove(farm_id.as_str())?;
                match serde_json::from_value::<FarmDTO>(value) {
                    Ok(dto) => Some(dto.into_farm(farm_id)),
                    Err(error) => {
                        warn!(%farm_id, %error, "skipping undecodable farm record");
                        None
                    }
                }
            })
            .collect())
    }
}
