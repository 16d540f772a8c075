use serde::Deserialize;
use serde_json::Value;

use crate::common_models::{
    farm::{Farm, FarmId, FarmLocation},
    guest::GrantId,
};
use crate::guest_access::imp::scan::dto::GuestAccessGrantDTO;
use crate::util::snapshot::children;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct FarmDTO {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub farm_type: Option<String>,
    pub size: Option<Value>,
    pub image_url: Option<String>,
    pub location: Option<FarmLocation>,
    #[serde(default)]
    pub guest_access: Option<Value>,
}

impl FarmDTO {
    /// Grants missing a token or a readable expiry are left out.
    pub fn into_farm(self, id: FarmId) -> Farm {
        Farm {
            id,
            name: self.name,
            farm_type: self.farm_type,
            size: self.size.and_then(|size| match size {
                Value::String(size) => Some(size),
                Value::Number(size) => Some(size.to_string()),
                _ => None,
            }),
            image_url: self.image_url,
            location: self.location,
            guest_access: self
                .guest_access
                .and_then(children)
                .unwrap_or_default()
                .into_iter()
                .filter_map(|(grant_id, grant)| {
                    serde_json::from_value::<GuestAccessGrantDTO>(grant)
                        .ok()?
                        .into_grant(GrantId::from(grant_id))
                })
                .collect(),
        }
    }
}
