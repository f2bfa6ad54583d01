// src/cache/session.rs
// =============================================================================
// Session-scoped key/value storage.
//
// The store deals in raw strings on purpose: callers serialize before they
// write and parse after they read, so a value can be corrupted or truncated
// and the reader has to cope with that (see github::fetch).
//
// Rust concepts:
// - Traits: SessionStore is the seam between the data source and storage
// - Interior mutability: Mutex lets us write through a shared &self
// - Send + Sync: the store is shared between concurrent fetches
// =============================================================================

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Ephemeral string storage scoped to one session.
///
/// There is no locking across calls: two writers for the same key race and
/// the last one wins.
pub trait SessionStore: Send + Sync {
    /// Returns the stored value, or None if the key was never written.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Stores a value, replacing any previous one.
    fn set_item(&self, key: &str, value: String);

    /// Drops every entry (end of session).
    fn clear(&self);
}

/// In-memory session store. Dropped with the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached users.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    // Poisoning is ignored: every entry in the map is a complete value.
    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStore for MemorySessionStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: String) {
        self.entries().insert(key.to_string(), value);
    }

    fn clear(&self) {
        self.entries().clear();
    }
}
