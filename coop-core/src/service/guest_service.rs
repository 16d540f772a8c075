//! Guest sign-in: turns a guest link's token into a guest session.

use std::sync::Arc;

use coop_providers::{
    common_models::{farm::FarmId, guest::GuestToken},
    guest_access::{error::GuestAccessError, GuestAccessResolver},
};
use tracing::{info, warn};

use crate::context::AppContext;

pub struct GuestService {
    pub resolver: Arc<dyn GuestAccessResolver>,
    pub context: AppContext,
}

impl GuestService {
    pub fn new(resolver: Arc<dyn GuestAccessResolver>, context: AppContext) -> Self {
        Self { resolver, context }
    }

    /// Resolves `token` and records the guest session in the context.
    ///
    /// Failures are recorded in the context as well and returned as is; they
    /// are final for this attempt and never retried here.
    pub async fn authenticate_guest(&self, token: GuestToken) -> Result<FarmId, GuestAccessError> {
        self.context.login_start();

        match self.resolver.resolve_guest_token(&token).await {
            Ok(farm_id) => {
                info!(%farm_id, "guest session started");
                self.context.set_guest_access(farm_id.to_owned(), token);
                Ok(farm_id)
            }
            Err(error) => {
                warn!(%error, "guest authentication failed");
                self.context.login_failure(error.to_string());
                Err(error)
            }
        }
    }
}
