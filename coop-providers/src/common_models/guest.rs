use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::macros::{impl_display, impl_from, impl_into, string_id};

string_id!(
    /// Key of a grant inside a farm's `guestAccess` map.
    GrantId
);

/// Opaque guest token. No format is assumed beyond being non-empty.
#[derive(Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct GuestToken(String);
impl_display!(GuestToken);
impl_from!(GuestToken; String);
impl_into!(GuestToken; String);

impl GuestToken {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// tokens are credentials, keep them out of debug logs
impl std::fmt::Debug for GuestToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("GuestToken").field(&"***").finish()
    }
}

/// Time-boxed, token-authenticated read capability scoped to one farm.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GuestAccessGrant {
    pub id: GrantId,
    pub token: GuestToken,
    pub expires_at: OffsetDateTime,
}

impl GuestAccessGrant {
    /// A grant expires once `expires_at` is strictly in the past.
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        self.expires_at < now
    }
}
