//! The **Cooplytics core** is the library behind the Cooplytics farm-management
//! application.
//!
//! Farm data lives in a hierarchical realtime key-path store: farms with their
//! guest access grants under `farms`, each owner's farm index under
//! `users/{uid}/farms` and every farm's chickens under `chickens/{farmId}`.
//!
//! ## Repository structure
//!
//! * **Providers** (`coop-providers`)
//!   * Key-path store, in memory or over the database's REST interface
//!   * Guest access resolver
//!   * Chicken provider
//!   * Farm provider
//! * **Core**
//!   * Application context
//!   * Services
//!
//! ## Getting started
//!
//! ```ignore rust
//! let core = CoopCore::connect(config)?;
//!
//! let farm_id = core
//!     .guest_service
//!     .authenticate_guest(GuestToken::from("abc"))
//!     .await?;
//!
//! let mut session = core.chicken_session();
//! session.load().await;
//! let first_page = session.default_page(0);
//! ```
//!
//! See `demos/guest_access_demo` for a complete walkthrough against an
//! in-memory store.

use std::sync::Arc;

use config::CoopCoreConfig;
use context::AppContext;
use coop_providers::{
    chicken::imp::store::StoreChickenProvider,
    farm::imp::store::StoreFarmProvider,
    guest_access::imp::scan::FarmScanResolver,
    key_path_store::{
        imp::rest::{Params as RestParams, RestKeyPathStore},
        KeyPathStore,
    },
    util::clock::SystemClock,
};
use service::{
    chicken_service::{ChickenService, ChickenSession},
    error::CoreError,
    farm_service::FarmService,
    guest_service::GuestService,
};

pub mod config;
pub mod context;
pub mod model;
pub mod service;

pub struct CoopCore {
    pub context: AppContext,
    pub guest_service: GuestService,
    pub chicken_service: ChickenService,
    pub farm_service: FarmService,
}

impl CoopCore {
    /// Wires the services on top of `store`. `None` uses the default configuration.
    pub fn new(config: Option<CoopCoreConfig>, store: Arc<dyn KeyPathStore>) -> Self {
        let config = config.unwrap_or_default();
        let context = AppContext::new();

        // guest access
        let guest_resolver = Arc::new(FarmScanResolver::new(
            store.clone(),
            Arc::new(SystemClock),
        ));

        // chickens and farms
        let chicken_provider = Arc::new(StoreChickenProvider::new(
            store.clone(),
            guest_resolver.clone(),
        ));
        let farm_provider = Arc::new(StoreFarmProvider::new(store));

        Self {
            guest_service: GuestService::new(guest_resolver, context.clone()),
            chicken_service: ChickenService::new(chicken_provider, config.chicken_config),
            farm_service: FarmService::new(farm_provider),
            context,
        }
    }

    /// Connects to the realtime database named in the store configuration.
    pub fn connect(config: CoopCoreConfig) -> Result<Self, CoreError> {
        let store_config = config.store_config.clone();
        let database_url = store_config
            .database_url
            .ok_or(CoreError::MissingDatabaseUrl)?;

        let store = Arc::new(RestKeyPathStore::new(
            reqwest::Client::new(),
            RestParams {
                database_url,
                auth_token: store_config.auth_token,
                poll_interval: store_config.poll_interval,
            },
        ));

        Ok(Self::new(Some(config), store))
    }

    /// A chicken session for whoever is currently signed in.
    pub fn chicken_session(&self) -> ChickenSession {
        self.chicken_service.session(self.context.identity())
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use coop_providers::{
        common_models::{farm::FarmId, guest::GuestToken},
        key_path_store::imp::in_memory::InMemoryKeyPathStore,
    };
    use serde_json::json;

    use super::*;
    use crate::model::SessionState;

    #[test]
    fn test_connect_requires_database_url() {
        let result = CoopCore::connect(CoopCoreConfig::default());

        assert!(matches!(result, Err(CoreError::MissingDatabaseUrl)));
    }

    #[tokio::test]
    async fn test_guest_sign_in_drives_chicken_session() {
        let store = Arc::new(InMemoryKeyPathStore::new(json!({
            "farms": {
                "f1": {"guestAccess": {"g1": {"token": "abc", "expiresAt": "2999-01-01T00:00:00Z"}}},
                "f2": {}
            },
            "chickens": {
                "f1": {"c1": {"name": "Henrietta"}},
                "f2": {"c1": {"name": "Clucky"}}
            }
        })));
        let core = CoopCore::new(None, store);

        let farm_id = core
            .guest_service
            .authenticate_guest(GuestToken::from("abc"))
            .await
            .unwrap();
        assert_eq!(farm_id, FarmId::from("f1"));

        let mut session = core.chicken_session();
        assert_eq!(session.load().await, &SessionState::Ready);

        let page = session.default_page(0);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].chicken.name.as_deref(), Some("Henrietta"));
    }
}
