//! Guest access: time-limited, token-authenticated read access to one farm.
//!
//! Grants live inside each farm document under `guestAccess`, keyed by an
//! internal grant id. Resolution only reads and evaluates them; creating,
//! expiring and revoking grants happens elsewhere.

use async_trait::async_trait;

use crate::{
    common_models::{farm::FarmId, guest::GuestToken},
    guest_access::error::GuestAccessError,
};

pub mod error;
pub mod imp;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait GuestAccessResolver: Send + Sync {
    /// Maps a guest token to the farm its grant covers.
    async fn resolve_guest_token(&self, token: &GuestToken) -> Result<FarmId, GuestAccessError>;
}
