use std::fmt;

use crate::common_models::{chicken::ChickenId, farm::FarmId, user::UserId};
use crate::key_path_store::error::KeyPathStoreError;

const FORBIDDEN_SEGMENT_CHARS: [char; 6] = ['/', '.', '#', '$', '[', ']'];

/// Validated store path. The empty path addresses the root.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct StorePath {
    segments: Vec<String>,
}

impl StorePath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Parses `a/b/c`. Leading and trailing slashes are ignored.
    pub fn parse(path: &str) -> Result<Self, KeyPathStoreError> {
        path.trim_matches('/')
            .split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(Self::root(), |path, segment| path.child(segment))
    }

    pub fn child(&self, segment: &str) -> Result<Self, KeyPathStoreError> {
        if segment.is_empty() || segment.contains(&FORBIDDEN_SEGMENT_CHARS[..]) {
            return Err(KeyPathStoreError::InvalidPath(format!(
                "invalid segment `{segment}` under `{self}`"
            )));
        }

        let mut segments = self.segments.clone();
        segments.push(segment.to_owned());
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn starts_with(&self, prefix: &StorePath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// True when a change at one path is visible at the other.
    pub fn overlaps(&self, other: &StorePath) -> bool {
        self.starts_with(other) || other.starts_with(self)
    }

    /// `farms`
    pub fn farms() -> Self {
        Self {
            segments: vec!["farms".to_owned()],
        }
    }

    /// `farms/{farmId}`
    pub fn farm(farm_id: &FarmId) -> Result<Self, KeyPathStoreError> {
        Self::farms().child(farm_id.as_str())
    }

    /// `users/{userId}/farms`
    pub fn user_farms(user_id: &UserId) -> Result<Self, KeyPathStoreError> {
        Self::parse("users")?.child(user_id.as_str())?.child("farms")
    }

    /// `users/{userId}/farms/{farmId}`
    pub fn user_farm(user_id: &UserId, farm_id: &FarmId) -> Result<Self, KeyPathStoreError> {
        Self::user_farms(user_id)?.child(farm_id.as_str())
    }

    /// `chickens/{farmId}`
    pub fn chickens(farm_id: &FarmId) -> Result<Self, KeyPathStoreError> {
        Self::parse("chickens")?.child(farm_id.as_str())
    }

    /// `chickens/{farmId}/{chickenId}`
    pub fn chicken(farm_id: &FarmId, chicken_id: &ChickenId) -> Result<Self, KeyPathStoreError> {
        Self::chickens(farm_id)?.child(chicken_id.as_str())
    }
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}
