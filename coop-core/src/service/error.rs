use coop_providers::{
    chicken::{error::ChickenProviderError, model::DenialReason},
    common_models::farm::FarmId,
};
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ChickenServiceError {
    #[error("User not authenticated and no guest token provided")]
    Unauthenticated,
    #[error("No access to farm `{0}`")]
    FarmAccessDenied(FarmId),
    #[error("Guest access denied: `{0}`")]
    GuestDenied(DenialReason),
    #[error("Chicken provider error: `{0}`")]
    ChickenProvider(#[from] ChickenProviderError),
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Missing database url")]
    MissingDatabaseUrl,
}
