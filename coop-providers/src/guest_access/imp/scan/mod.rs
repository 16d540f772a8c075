//! Resolver scanning every farm's embedded grant map.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::{
    common_models::{
        farm::FarmId,
        guest::{GrantId, GuestToken},
    },
    guest_access::{error::GuestAccessError, GuestAccessResolver},
    key_path_store::{path::StorePath, KeyPathStore},
    util::{clock::Clock, snapshot::children},
};

pub(crate) mod dto;


use dto::{FarmGuestAccessDTO, GuestAccessGrantDTO};

/// Loads the whole farm collection in one read and takes the first grant whose
/// token matches.
///
/// Farms are visited in the key order of the snapshot, and grants in the key
/// order of each `guestAccess` map. Token uniqueness is not enforced by the
/// data model: when two grants share a token, the first one visited decides
/// the outcome and scanning stops there, even if it is expired.
pub struct FarmScanResolver {
    store: Arc<dyn KeyPathStore>,
    clock: Arc<dyn Clock>,
}

impl FarmScanResolver {
    pub fn new(store: Arc<dyn KeyPathStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}

#[async_trait]
impl GuestAccessResolver for FarmScanResolver {
    async fn resolve_guest_token(&self, token: &GuestToken) -> Result<FarmId, GuestAccessError> {
        if token.is_empty() {
            return Err(GuestAccessError::MissingToken);
        }

        let Some(farms) = self.store.read(&StorePath::farms()).await?.and_then(children) else {
            debug!("farm collection is empty");
            return Err(GuestAccessError::UnknownToken);
        };

        let now = self.clock.now_utc();

        for (farm_id, farm) in farms {
            let farm: FarmGuestAccessDTO = match serde_json::from_value(farm) {
                Ok(farm) => farm,
                Err(error) => {
                    warn!(%farm_id, %error, "skipping undecodable farm record");
                    continue;
                }
            };

            let grants = farm.guest_access.and_then(children).unwrap_or_default();
            for (grant_id, grant) in grants {
                let grant: GuestAccessGrantDTO = match serde_json::from_value(grant) {
                    Ok(grant) => grant,
                    Err(error) => {
                        warn!(%farm_id, %grant_id, %error, "skipping undecodable guest grant");
                        continue;
                    }
                };

                if grant.token.as_deref() != Some(token.as_str()) {
                    continue;
                }

                let farm_id = FarmId::from(farm_id);
                let Some(grant) = grant.into_grant(GrantId::from(grant_id.as_str())) else {
                    warn!(%farm_id, %grant_id, "guest grant has unreadable expiry, treating as expired");
                    return Err(GuestAccessError::ExpiredGrant(farm_id));
                };

                return if grant.is_expired_at(now) {
                    info!(%farm_id, grant_id = %grant.id, "guest grant expired");
                    Err(GuestAccessError::ExpiredGrant(farm_id))
                } else {
                    info!(%farm_id, grant_id = %grant.id, "guest token resolved");
                    Ok(farm_id)
                };
            }
        }

        debug!("guest token matched no grant");
        Err(GuestAccessError::UnknownToken)
    }
}
