use std::collections::BTreeSet;

use serde_json::Value;
use tracing::warn;

use crate::common_models::{
    chicken::{Chicken, ChickenId, FarmChicken},
    farm::FarmId,
};
use crate::util::{snapshot::children, truthy::is_truthy};

/// Decodes the value at `chickens/{farmId}`, tagging every record with the farm.
pub(super) fn chickens_from_snapshot(farm_id: &FarmId, value: Option<Value>) -> Vec<FarmChicken> {
    let records = match value.map(children) {
        None => return vec![],
        Some(Some(records)) => records,
        Some(None) => {
            warn!(%farm_id, "chicken collection is not a collection, ignoring");
            return vec![];
        }
    };

    records
        .into_iter()
        .filter_map(|(id, record)| match serde_json::from_value::<Chicken>(record) {
            Ok(chicken) => Some(FarmChicken {
                farm_id: farm_id.to_owned(),
                id: ChickenId::from(id),
                chicken,
            }),
            Err(error) => {
                warn!(%farm_id, chicken_id = %id, %error, "skipping undecodable chicken record");
                None
            }
        })
        .collect()
}

/// Keys of a `users/{uid}/farms` index whose marker is truthy.
pub(crate) fn farm_ids_from_index(value: Option<Value>) -> BTreeSet<FarmId> {
    match value.map(children) {
        Some(Some(index)) => index
            .into_iter()
            .filter(|(_, marker)| is_truthy(marker))
            .map(|(farm_id, _)| FarmId::from(farm_id))
            .collect(),
        Some(None) => {
            warn!("user farm index is not a collection, ignoring");
            BTreeSet::new()
        }
        None => BTreeSet::new(),
    }
}
