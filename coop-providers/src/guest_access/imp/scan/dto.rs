use serde::Deserialize;
use serde_json::Value;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::common_models::guest::{GrantId, GuestAccessGrant, GuestToken};

/// The slice of a farm document the resolver looks at.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FarmGuestAccessDTO {
    /// Grants keyed by grant id, as a map or an index-keyed array.
    #[serde(default)]
    pub guest_access: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GuestAccessGrantDTO {
    pub token: Option<String>,
    pub expires_at: Option<String>,
}

impl GuestAccessGrantDTO {
    pub fn expires_at(&self) -> Option<OffsetDateTime> {
        self.expires_at
            .as_deref()
            .and_then(|value| OffsetDateTime::parse(value, &Rfc3339).ok())
    }

    /// Full grant, or `None` when token or expiry is unusable.
    pub fn into_grant(self, id: GrantId) -> Option<GuestAccessGrant> {
        let expires_at = self.expires_at()?;
        let token = self.token.filter(|token| !token.is_empty())?;

        Some(GuestAccessGrant {
            id,
            token: GuestToken::from(token),
            expires_at,
        })
    }
}
