//! Enumerates errors related to guest token resolution.

use thiserror::Error;

use crate::common_models::farm::FarmId;
use crate::key_path_store::error::KeyPathStoreError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GuestAccessError {
    #[error("No guest token provided")]
    MissingToken,
    #[error("Unknown guest token")]
    UnknownToken,
    #[error("Guest grant for farm `{0}` has expired")]
    ExpiredGrant(FarmId),
    #[error("Store unavailable: `{0}`")]
    StoreUnavailable(#[from] KeyPathStoreError),
}
