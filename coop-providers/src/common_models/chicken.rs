use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use super::farm::FarmId;
use super::macros::string_id;

string_id!(
    /// Chicken identifier. Only unique within its owning farm.
    ChickenId
);

/// Chicken record as stored under `chickens/{farmId}/{chickenId}`.
///
/// Attributes the model does not know about are kept in `extra` so that an
/// update writes them back untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chicken {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_weight: Option<NumericValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_height: Option<NumericValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub egg_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_hatched: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub measurements: BTreeMap<String, Measurement>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Chicken {
    /// Measurement with the most recent `date`. Entries without a parseable
    /// date are only considered when no dated entry exists.
    pub fn latest_measurement(&self) -> Option<&Measurement> {
        self.measurements
            .values()
            .max_by_key(|measurement| measurement.taken_at())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<NumericValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<NumericValue>,
}

impl Measurement {
    pub fn taken_at(&self) -> Option<OffsetDateTime> {
        self.date.as_deref().and_then(parse_timestamp)
    }
}

/// Numeric attribute as entered through the forms: either a JSON number or
/// the text the user typed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericValue {
    Number(f64),
    Text(String),
}

impl NumericValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NumericValue::Number(value) => Some(*value).filter(|value| value.is_finite()),
            NumericValue::Text(text) => text
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite()),
        }
    }
}

impl From<f64> for NumericValue {
    fn from(value: f64) -> Self {
        NumericValue::Number(value)
    }
}

/// A chicken tagged with its source farm. The pair `(farm_id, id)` is the key.
#[derive(Clone, Debug, PartialEq)]
pub struct FarmChicken {
    pub farm_id: FarmId,
    pub id: ChickenId,
    pub chicken: Chicken,
}

/// Parses either an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (taken as
/// midnight UTC).
pub fn parse_timestamp(value: &str) -> Option<OffsetDateTime> {
    let value = value.trim();

    if let Ok(timestamp) = OffsetDateTime::parse(value, &Rfc3339) {
        return Some(timestamp);
    }

    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|date| date.midnight().assume_utc())
}
