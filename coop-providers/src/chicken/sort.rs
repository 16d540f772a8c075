//! Sorting and paging of merged chicken collections.
//!
//! Each sort key has one fixed comparison rule; there is no coercion between
//! kinds of values:
//!
//! | key | rule |
//! |---|---|
//! | `identifier`, `name`, `type`, `location`, `eggColor`, `farmId`, `id` | lexicographic |
//! | `currentWeight`, `currentHeight` | numeric, numeric strings are parsed |
//! | `dateHatched` | chronological, `YYYY-MM-DD` or RFC 3339 |
//!
//! Missing and unparseable values sort after every present value whatever the
//! direction. The sort is stable, so records that compare equal keep their
//! merge order.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use time::OffsetDateTime;

use crate::common_models::{
    chicken::{parse_timestamp, FarmChicken, NumericValue},
    page::Page,
};

#[derive(
    Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Identifier,
    #[default]
    Name,
    #[strum(serialize = "type")]
    #[serde(rename = "type")]
    Breed,
    CurrentWeight,
    CurrentHeight,
    Location,
    EggColor,
    DateHatched,
    FarmId,
    Id,
}

/// Where a key's value comes from, typed by how it compares.
enum Field {
    Text(for<'a> fn(&'a FarmChicken) -> Option<&'a str>),
    Number(fn(&FarmChicken) -> Option<f64>),
    Time(fn(&FarmChicken) -> Option<OffsetDateTime>),
}

impl SortKey {
    fn field(self) -> Field {
        match self {
            SortKey::Identifier => Field::Text(|r| r.chicken.identifier.as_deref()),
            SortKey::Name => Field::Text(|r| r.chicken.name.as_deref()),
            SortKey::Breed => Field::Text(|r| r.chicken.breed.as_deref()),
            SortKey::Location => Field::Text(|r| r.chicken.location.as_deref()),
            SortKey::EggColor => Field::Text(|r| r.chicken.egg_color.as_deref()),
            SortKey::FarmId => Field::Text(|r| Some(r.farm_id.as_str())),
            SortKey::Id => Field::Text(|r| Some(r.id.as_str())),
            SortKey::CurrentWeight => Field::Number(|r| numeric(&r.chicken.current_weight)),
            SortKey::CurrentHeight => Field::Number(|r| numeric(&r.chicken.current_height)),
            SortKey::DateHatched => Field::Time(|r| {
                r.chicken.date_hatched.as_deref().and_then(parse_timestamp)
            }),
        }
    }
}

fn numeric(value: &Option<NumericValue>) -> Option<f64> {
    value.as_ref().and_then(NumericValue::as_f64)
}

fn present_first<T>(
    a: Option<T>,
    b: Option<T>,
    ascending: bool,
    cmp: impl Fn(&T, &T) -> Ordering,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            let ordering = cmp(&a, &b);
            if ascending {
                ordering
            } else {
                ordering.reverse()
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn compare(a: &FarmChicken, b: &FarmChicken, key: SortKey, ascending: bool) -> Ordering {
    match key.field() {
        Field::Text(value) => present_first(value(a), value(b), ascending, |a, b| a.cmp(b)),
        Field::Number(value) => present_first(value(a), value(b), ascending, f64::total_cmp),
        Field::Time(value) => present_first(value(a), value(b), ascending, |a, b| a.cmp(b)),
    }
}

/// Stable in-place sort.
pub fn sort_chickens(records: &mut [FarmChicken], key: SortKey, ascending: bool) {
    records.sort_by(|a, b| compare(a, b, key, ascending));
}

/// Sorts `records` and returns page `page_index` (zero-based) of `page_size`
/// records. A page past the end is empty.
pub fn sort_and_paginate(
    mut records: Vec<FarmChicken>,
    key: SortKey,
    ascending: bool,
    page_index: usize,
    page_size: usize,
) -> Page<FarmChicken> {
    sort_chickens(&mut records, key, ascending);
    Page::slice(records, page_index, page_size)
}
