//! Session and authentication state shared by every handler.
//!
//! An [`AppContext`] is created once and handed to each service explicitly.
//! Observers subscribe to it and are notified on every change.

use std::sync::Arc;

use coop_providers::{
    chicken::model::AccessIdentity,
    common_models::{farm::FarmId, guest::GuestToken, user::UserId},
};
use tokio::sync::watch;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuestSession {
    pub farm_id: FarmId,
    pub token: GuestToken,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<UserId>,
    pub guest: Option<GuestSession>,
    pub loading: bool,
    pub error: Option<String>,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Owner identity when signed in, otherwise the guest token if any.
    pub fn identity(&self) -> Option<AccessIdentity> {
        match (&self.user, &self.guest) {
            (Some(user), _) => Some(AccessIdentity::Owner(user.to_owned())),
            (None, Some(guest)) => Some(AccessIdentity::Guest(guest.token.to_owned())),
            (None, None) => None,
        }
    }
}

#[derive(Clone)]
pub struct AppContext {
    state: Arc<watch::Sender<AuthState>>,
}

impl AppContext {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(AuthState::default());
        Self {
            state: Arc::new(sender),
        }
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn identity(&self) -> Option<AccessIdentity> {
        self.state.borrow().identity()
    }

    /// Receiver that sees every later change.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn login_start(&self) {
        self.update(|state| {
            state.loading = true;
            state.error = None;
        });
    }

    pub fn login_success(&self, user: UserId) {
        self.update(|state| {
            state.user = Some(user);
            state.loading = false;
            state.error = None;
        });
    }

    pub fn login_failure(&self, error: impl Into<String>) {
        let error = error.into();
        self.update(|state| {
            state.loading = false;
            state.error = Some(error);
        });
    }

    pub fn set_guest_access(&self, farm_id: FarmId, token: GuestToken) {
        self.update(|state| {
            state.guest = Some(GuestSession { farm_id, token });
            state.loading = false;
            state.error = None;
        });
    }

    pub fn logout(&self) {
        self.update(|state| *state = AuthState::default());
    }

    pub fn clear_error(&self) {
        self.update(|state| state.error = None);
    }

    pub fn reset(&self) {
        self.logout();
    }

    fn update(&self, modify: impl FnOnce(&mut AuthState)) {
        self.state.send_modify(modify);
        tracing::debug!("auth state changed");
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let context = AppContext::new();
        let mut receiver = context.subscribe();

        context.login_start();
        assert!(receiver.has_changed().unwrap());
        assert!(receiver.borrow_and_update().loading);

        let observer = context.clone();
        observer.login_success(UserId::from("u1"));
        receiver.changed().await.unwrap();

        let state = receiver.borrow().clone();
        assert!(state.is_authenticated());
        assert!(!state.loading);
        assert_eq!(
            state.identity(),
            Some(AccessIdentity::Owner(UserId::from("u1")))
        );
    }

    #[test]
    fn test_owner_identity_wins_over_guest() {
        let context = AppContext::new();
        context.set_guest_access(FarmId::from("f1"), GuestToken::from("abc"));
        assert_eq!(
            context.identity(),
            Some(AccessIdentity::Guest(GuestToken::from("abc")))
        );

        context.login_success(UserId::from("u1"));
        assert_eq!(
            context.identity(),
            Some(AccessIdentity::Owner(UserId::from("u1")))
        );
    }

    #[test]
    fn test_logout_clears_everything() {
        let context = AppContext::new();
        context.login_success(UserId::from("u1"));
        context.set_guest_access(FarmId::from("f1"), GuestToken::from("abc"));
        context.login_failure("boom");

        context.logout();

        assert_eq!(context.state(), AuthState::default());
        assert_eq!(context.identity(), None);
    }

    #[test]
    fn test_clear_error() {
        let context = AppContext::new();
        context.login_failure("Failed to login");
        assert_eq!(context.state().error.as_deref(), Some("Failed to login"));

        context.clear_error();
        assert_eq!(context.state().error, None);
    }
}
