// src/cache/mod.rs
// =============================================================================
// This module holds the session cache.
//
// The cache is a plain string key/value store, keyed by user identifier.
// It only lives as long as one "session", which for a CLI means one process
// run. Nothing is written to disk.
//
// Submodules:
// - session: the SessionStore trait and the in-memory implementation
// =============================================================================

mod session;

pub use session::{MemorySessionStore, SessionStore};
