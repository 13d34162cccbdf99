//! Indefinite-lifetime string cache used to remember alias → token mappings.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// A string → string store with no expiry and no deletion.
///
/// Implementations must be safe to share across threads; the client holds one
/// behind an `Arc` for its whole lifetime.
pub trait Cache: Send + Sync {
    /// True iff a value has been stored for `key`.
    fn has(&self, key: &str) -> bool;

    /// Stores `value` for `key`, replacing any previous value.
    fn put(&self, key: &str, value: &str);

    /// The stored value for `key`, if any.
    fn get(&self, key: &str) -> Option<String>;
}

/// In-memory cache guarded by a reader/writer lock: lookups share the lock,
/// writes take it exclusively.
#[derive(Debug, Default)]
pub struct MemoryCache {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// Poisoned locks are recovered: a single insert never leaves the map inconsistent.
impl Cache for MemoryCache {
    fn has(&self, key: &str) -> bool {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    fn put(&self, key: &str, value: &str) {
        self.items
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }

    fn get(&self, key: &str) -> Option<String> {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}
