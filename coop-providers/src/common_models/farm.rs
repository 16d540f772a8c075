use serde::{Deserialize, Serialize};

use super::guest::GuestAccessGrant;
use super::macros::string_id;

string_id!(
    /// Farm identifier, the path segment under `farms/`.
    FarmId
);

#[derive(Clone, Debug, PartialEq)]
pub struct Farm {
    pub id: FarmId,
    pub name: Option<String>,
    pub farm_type: Option<String>,
    pub size: Option<String>,
    pub image_url: Option<String>,
    pub location: Option<FarmLocation>,
    pub guest_access: Vec<GuestAccessGrant>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmLocation {
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}
