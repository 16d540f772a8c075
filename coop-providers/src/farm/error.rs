//! Enumerates errors related to the farm provider.

use thiserror::Error;

use crate::common_models::farm::FarmId;
use crate::key_path_store::error::KeyPathStoreError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FarmProviderError {
    #[error("Farm `{0}` not found")]
    NotFound(FarmId),
    #[error("Invalid path: `{0}`")]
    InvalidPath(String),
    #[error("Invalid farm data: `{0}`")]
    InvalidValue(String),
    #[error("Store unavailable: `{0}`")]
    StoreUnavailable(KeyPathStoreError),
}

impl From<KeyPathStoreError> for FarmProviderError {
    fn from(value: KeyPathStoreError) -> Self {
        match value {
            KeyPathStoreError::InvalidPath(path) => Self::InvalidPath(path),
            KeyPathStoreError::InvalidValue(value) => Self::InvalidValue(value),
            other => Self::StoreUnavailable(other),
        }
    }
}

impl From<serde_json::Error> for FarmProviderError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidValue(value.to_string())
    }
}
