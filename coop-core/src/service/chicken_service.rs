//! Chicken listing sessions and single-chicken operations.
//!
//! A [`ChickenSession`] drives one caller's view of their chickens: it resolves
//! which farms the identity may read, fetches and merges their chickens and
//! hands out sorted pages of the result. Sessions can watch the accessible
//! farms and refetch when any of them changes.

use std::sync::Arc;

use coop_providers::{
    chicken::{
        model::{AccessIdentity, AccessibleFarms, ChickenFetch, DenialReason, FarmFetchFailure},
        sort::{sort_and_paginate, SortKey},
        ChickenProvider,
    },
    common_models::{
        chicken::{Chicken, ChickenId, FarmChicken},
        farm::FarmId,
        page::Page,
    },
    key_path_store::subscription::Subscription,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{config::ChickenConfig, model::SessionState, service::error::ChickenServiceError};

pub struct ChickenService {
    pub chicken_provider: Arc<dyn ChickenProvider>,
    pub config: ChickenConfig,
}

impl ChickenService {
    pub fn new(chicken_provider: Arc<dyn ChickenProvider>, config: ChickenConfig) -> Self {
        Self {
            chicken_provider,
            config,
        }
    }

    /// Starts a session for `identity`. Nothing is fetched until
    /// [`ChickenSession::load`] is called.
    pub fn session(&self, identity: Option<AccessIdentity>) -> ChickenSession {
        ChickenSession::new(self.chicken_provider.clone(), identity, self.config.clone())
    }

    /// Reads one chicken, provided its farm is accessible to `identity`.
    pub async fn get_chicken_details(
        &self,
        identity: Option<&AccessIdentity>,
        farm_id: &FarmId,
        chicken_id: &ChickenId,
    ) -> Result<FarmChicken, ChickenServiceError> {
        let identity = identity.ok_or(ChickenServiceError::Unauthenticated)?;

        let access = self.chicken_provider.list_accessible_farms(identity).await?;
        if let Some(reason) = access.denial {
            return Err(ChickenServiceError::GuestDenied(reason));
        }
        if !access.contains(farm_id) {
            return Err(ChickenServiceError::FarmAccessDenied(farm_id.to_owned()));
        }

        let chicken = self
            .chicken_provider
            .get_chicken(farm_id, chicken_id)
            .await?;

        Ok(FarmChicken {
            farm_id: farm_id.to_owned(),
            id: chicken_id.to_owned(),
            chicken,
        })
    }

    pub async fn add_chicken(
        &self,
        farm_id: &FarmId,
        chicken: Chicken,
    ) -> Result<ChickenId, ChickenServiceError> {
        let chicken_id = self.chicken_provider.add_chicken(farm_id, chicken).await?;
        info!(%farm_id, %chicken_id, "chicken added");
        Ok(chicken_id)
    }

    pub async fn update_chicken(
        &self,
        farm_id: &FarmId,
        chicken_id: &ChickenId,
        chicken: Chicken,
    ) -> Result<(), ChickenServiceError> {
        Ok(self
            .chicken_provider
            .update_chicken(farm_id, chicken_id, chicken)
            .await?)
    }

    pub async fn delete_chicken(
        &self,
        farm_id: &FarmId,
        chicken_id: &ChickenId,
    ) -> Result<(), ChickenServiceError> {
        self.chicken_provider
            .delete_chicken(farm_id, chicken_id)
            .await?;
        info!(%farm_id, %chicken_id, "chicken deleted");
        Ok(())
    }
}

pub struct ChickenSession {
    chicken_provider: Arc<dyn ChickenProvider>,
    identity: Option<AccessIdentity>,
    config: ChickenConfig,
    state: SessionState,
    access: AccessibleFarms,
    collection: ChickenFetch,
    subscriptions: Vec<Subscription>,
    changes: Option<mpsc::UnboundedReceiver<FarmId>>,
}

impl ChickenSession {
    pub fn new(
        chicken_provider: Arc<dyn ChickenProvider>,
        identity: Option<AccessIdentity>,
        config: ChickenConfig,
    ) -> Self {
        Self {
            chicken_provider,
            identity,
            config,
            state: SessionState::Uninitialized,
            access: AccessibleFarms::default(),
            collection: ChickenFetch::default(),
            subscriptions: vec![],
            changes: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn identity(&self) -> Option<&AccessIdentity> {
        self.identity.as_ref()
    }

    pub fn accessible_farms(&self) -> &AccessibleFarms {
        &self.access
    }

    /// Why a guest got an empty farm set, if they did.
    pub fn denial(&self) -> Option<DenialReason> {
        self.access.denial
    }

    /// Merged chickens from the last fetch, in farm-id order.
    pub fn chickens(&self) -> &[FarmChicken] {
        &self.collection.chickens
    }

    /// Farms whose chickens could not be read by the last fetch. Their
    /// records are missing from [`Self::chickens`] until a later refresh
    /// succeeds.
    pub fn failures(&self) -> &[FarmFetchFailure] {
        &self.collection.failures
    }

    pub fn is_watching(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    /// Runs a full cycle: resolves access, then fetches the chickens of every
    /// accessible farm.
    pub async fn load(&mut self) -> &SessionState {
        self.transition(SessionState::ResolvingAccess);

        let Some(identity) = self.identity.clone() else {
            self.transition(SessionState::Denied(DenialReason::Unauthenticated));
            return &self.state;
        };

        self.transition(match identity {
            AccessIdentity::Owner(_) => SessionState::FetchingOwnerFarms,
            AccessIdentity::Guest(_) => SessionState::FetchingGuestFarm,
        });

        match self.chicken_provider.list_accessible_farms(&identity).await {
            Ok(access) => {
                if let Some(reason) = access.denial {
                    info!(%reason, "guest access denied, continuing with no farms");
                }
                self.access = access;
            }
            Err(error) => {
                self.transition(SessionState::Failed(error));
                return &self.state;
            }
        }

        self.fetch().await
    }

    /// Refetches the chickens of the already resolved farms.
    ///
    /// An uninitialized session runs a full [`Self::load`] instead. Terminal
    /// sessions are left untouched.
    pub async fn refresh(&mut self) -> &SessionState {
        match self.state {
            SessionState::Uninitialized => self.load().await,
            SessionState::Ready => self.fetch().await,
            _ => {
                debug!(state = %self.state, "refresh ignored");
                &self.state
            }
        }
    }

    /// Switches the session to another identity. Access is resolved again on
    /// the next [`Self::load`]; existing subscriptions are released.
    ///
    /// Setting the current identity again only resets a terminal session.
    pub fn set_identity(&mut self, identity: Option<AccessIdentity>) {
        if self.identity == identity && !self.state.is_terminal() {
            return;
        }

        self.close();
        self.identity = identity;
        self.access = AccessibleFarms::default();
        self.collection = ChickenFetch::default();
        self.transition(SessionState::Uninitialized);
    }

    /// Subscribes to the chickens of every accessible farm. Changes are
    /// reported by [`Self::next_change`].
    pub async fn watch(&mut self) -> Result<(), ChickenServiceError> {
        self.close();

        let (sender, mut receiver) = mpsc::unbounded_channel();
        let mut subscriptions = Vec::with_capacity(self.access.farms.len());

        for farm_id in &self.access.farms {
            let sender = sender.clone();
            let changed = farm_id.to_owned();
            let subscription = self
                .chicken_provider
                .subscribe_chickens(
                    farm_id,
                    Box::new(move |_| {
                        let _ = sender.send(changed.to_owned());
                    }),
                )
                .await?;
            subscriptions.push(subscription);
        }

        // the initial snapshots mirror what was just fetched
        while receiver.try_recv().is_ok() {}

        debug!(farms = subscriptions.len(), "watching chickens");
        self.subscriptions = subscriptions;
        self.changes = Some(receiver);
        Ok(())
    }

    /// Waits for a change in any watched farm. `None` when the session is not
    /// watching.
    pub async fn next_change(&mut self) -> Option<FarmId> {
        self.changes.as_mut()?.recv().await
    }

    /// Waits for a change, then refetches. Changes that piled up meanwhile are
    /// folded into the same refetch.
    pub async fn refresh_on_change(&mut self) -> Option<&SessionState> {
        let farm_id = self.next_change().await?;
        debug!(%farm_id, "chickens changed");

        if let Some(changes) = self.changes.as_mut() {
            while changes.try_recv().is_ok() {}
        }

        Some(self.refresh().await)
    }

    /// Releases all subscriptions.
    pub fn close(&mut self) {
        self.subscriptions.clear();
        self.changes = None;
    }

    /// Page `page_index` of the last fetched collection, `page_size` taken from
    /// the configuration.
    pub fn page(&self, sort_key: SortKey, ascending: bool, page_index: usize) -> Page<FarmChicken> {
        sort_and_paginate(
            self.collection.chickens.clone(),
            sort_key,
            ascending,
            page_index,
            self.config.page_size,
        )
    }

    /// Like [`Self::page`] with the configured default ordering.
    pub fn default_page(&self, page_index: usize) -> Page<FarmChicken> {
        self.page(
            self.config.default_sort_key,
            self.config.ascending,
            page_index,
        )
    }

    async fn fetch(&mut self) -> &SessionState {
        self.transition(SessionState::FetchingChickens);

        self.collection = self
            .chicken_provider
            .fetch_chickens_for_farms(&self.access.farms)
            .await;

        if let Some(failure) = self.collection.failures.first() {
            warn!(
                farm_id = %failure.farm_id,
                failed = self.collection.failures.len(),
                "chicken fetch incomplete"
            );
        }
        self.transition(SessionState::Ready);

        &self.state
    }

    fn transition(&mut self, next: SessionState) {
        debug!(from = %self.state, to = %next, "chicken session");
        self.state = next;
    }
}
