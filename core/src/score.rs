use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

use crate::*;

/// Opaque string key-value persistence, e.g. the browser's local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> core::result::Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> core::result::Result<(), StoreError>;
}

/// In-memory store, used by native hosts and tests.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Default::default()
    }

    /// Store that accepts reads but rejects every write.
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Default::default()
        }
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> core::result::Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> core::result::Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::WriteFailed {
                key: key.to_string(),
                reason: "store is read-only".to_string(),
            });
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Reads the run of digits at the start of `raw`, ignoring leading whitespace and anything after the digits.
fn parse_leading_digits(raw: &str) -> Option<Score> {
    let raw = raw.trim_start();
    let raw = raw.strip_prefix('+').unwrap_or(raw);
    let end = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    raw[..end].parse().ok()
}

/// Persists the best score across sessions.
///
/// Storage problems never surface to the game: a missing or unreadable value counts as zero and a failed write
/// only loses the cross-session copy.
#[derive(Clone, Debug)]
pub struct HighScoreStore<S> {
    store: S,
    cached: Score,
}

impl<S: KeyValueStore> HighScoreStore<S> {
    pub const KEY: &'static str = "memoria:high-score";

    pub fn new(store: S) -> Self {
        Self { store, cached: 0 }
    }

    /// Reads the persisted value, meant to be called once at startup.
    pub fn load(&mut self) -> Score {
        self.cached = match self.store.get(Self::KEY) {
            Ok(Some(raw)) => parse_leading_digits(&raw).unwrap_or_else(|| {
                log::warn!("ignoring unparsable high score {:?}", raw);
                0
            }),
            Ok(None) => 0,
            Err(err) => {
                log::warn!("could not read high score: {}", err);
                0
            }
        };
        log::debug!("loaded high score: {}", self.cached);
        self.cached
    }

    /// Stores `score` if it beats the current high score, returns whether it did.
    pub fn record(&mut self, score: Score) -> bool {
        if score <= self.cached {
            return false;
        }
        self.cached = score;
        if let Err(err) = self.store.set(Self::KEY, &score.to_string()) {
            log::error!("could not save high score: {}", err);
        }
        true
    }

    pub fn high_score(&self) -> Score {
        self.cached
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
