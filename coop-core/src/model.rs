use coop_providers::chicken::{error::ChickenProviderError, model::DenialReason};
use strum_macros::Display;

/// Lifecycle of a [`crate::service::chicken_service::ChickenSession`].
///
/// `Denied` and `Failed` are terminal for the session; `Ready` can re-enter
/// `FetchingChickens` on refresh. `Failed` is only reached when the accessible
/// farms cannot be resolved. Farms whose chickens fail to load still end in
/// `Ready`, listed in the session's failures.
#[derive(Clone, Debug, Default, PartialEq, Display)]
pub enum SessionState {
    #[default]
    Uninitialized,
    ResolvingAccess,
    FetchingOwnerFarms,
    FetchingGuestFarm,
    FetchingChickens,
    Ready,
    Denied(DenialReason),
    Failed(ChickenProviderError),
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Denied(_) | SessionState::Failed(_))
    }
}
