use std::collections::BTreeSet;

use strum::Display;

use crate::{
    chicken::error::ChickenProviderError,
    common_models::{chicken::FarmChicken, farm::FarmId, guest::GuestToken, user::UserId},
    guest_access::error::GuestAccessError,
    key_path_store::error::KeyPathStoreError,
};

/// Who is asking.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AccessIdentity {
    Owner(UserId),
    Guest(GuestToken),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Display)]
pub enum DenialReason {
    Unauthenticated,
    MissingToken,
    UnknownToken,
    ExpiredGrant,
}

/// Splits guest resolution failures into access denials and store failures.
impl TryFrom<GuestAccessError> for DenialReason {
    type Error = KeyPathStoreError;

    fn try_from(value: GuestAccessError) -> Result<Self, Self::Error> {
        match value {
            GuestAccessError::MissingToken => Ok(Self::MissingToken),
            GuestAccessError::UnknownToken => Ok(Self::UnknownToken),
            GuestAccessError::ExpiredGrant(_) => Ok(Self::ExpiredGrant),
            GuestAccessError::StoreUnavailable(error) => Err(error),
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AccessibleFarms {
    pub farms: BTreeSet<FarmId>,
    pub denial: Option<DenialReason>,
}

impl AccessibleFarms {
    pub fn denied(reason: DenialReason) -> Self {
        Self {
            farms: BTreeSet::new(),
            denial: Some(reason),
        }
    }

    pub fn contains(&self, farm_id: &FarmId) -> bool {
        self.farms.contains(farm_id)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FarmFetchFailure {
    pub farm_id: FarmId,
    pub error: ChickenProviderError,
}

/// Merged chickens of several farms, in farm-id order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChickenFetch {
    pub chickens: Vec<FarmChicken>,
    pub failures: Vec<FarmFetchFailure>,
}

pub type ChickenChangeCallback = Box<dyn Fn(Vec<FarmChicken>) + Send + Sync>;
