//! Enumerates errors related to the chicken provider.

use thiserror::Error;

use crate::common_models::{chicken::ChickenId, farm::FarmId};
use crate::key_path_store::error::KeyPathStoreError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ChickenProviderError {
    #[error("Chicken `{chicken_id}` not found in farm `{farm_id}`")]
    NotFound {
        farm_id: FarmId,
        chicken_id: ChickenId,
    },
    #[error("Invalid path: `{0}`")]
    InvalidPath(String),
    #[error("Invalid chicken data: `{0}`")]
    InvalidValue(String),
    #[error("Store unavailable: `{0}`")]
    StoreUnavailable(KeyPathStoreError),
}

impl From<KeyPathStoreError> for ChickenProviderError {
    fn from(value: KeyPathStoreError) -> Self {
        match value {
            KeyPathStoreError::InvalidPath(path) => Self::InvalidPath(path),
            KeyPathStoreError::InvalidValue(value) => Self::InvalidValue(value),
            other => Self::StoreUnavailable(other),
        }
    }
}

impl From<serde_json::Error> for ChickenProviderError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidValue(value.to_string())
    }
}
