use alloc::string::String;
use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Unknown color scheme name")]
    UnknownScheme,
    #[error("Unknown difficulty name")]
    UnknownDifficulty,
}

pub type Result<T> = core::result::Result<T, GameError>;

/// Failure reported by a [`KeyValueStore`](crate::KeyValueStore) backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Storage backend is unavailable: {0}")]
    Unavailable(String),
    #[error("Could not write key {key}: {reason}")]
    WriteFailed { key: String, reason: String },
}
