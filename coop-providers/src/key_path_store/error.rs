//! Enumerates errors related to the key-path store.

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum KeyPathStoreError {
    #[error("Store unavailable: `{0}`")]
    Unavailable(String),
    #[error("Invalid path: `{0}`")]
    InvalidPath(String),
    #[error("Invalid value: `{0}`")]
    InvalidValue(String),
}

impl From<serde_json::Error> for KeyPathStoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidValue(value.to_string())
    }
}
