//! Persistent key-value store adapters.
//!
//! # Responsibility
//! - Define the opaque string storage contract used by the registry.
//! - Provide SQLite-backed and in-memory implementations.
//!
//! # Invariants
//! - Store operations never return errors to the registry; failures are
//!   logged and degrade to "absent" reads or dropped writes.
//! - In-memory registry state stays authoritative for the running session.

mod memory_store;
mod sqlite_store;

pub use memory_store::MemoryStore;
pub use sqlite_store::SqliteStore;

use std::sync::Arc;

/// Best-effort string storage keyed by fixed names.
pub trait PersistentStore: Send + Sync {
    /// Returns the stored value, or `None` when absent or unreadable.
    fn load(&self, key: &str) -> Option<String>;
    /// Stores `value` under `key`; failures are swallowed.
    fn save(&self, key: &str, value: &str);
    /// Removes `key`; failures are swallowed.
    fn remove(&self, key: &str);
}

impl<S: PersistentStore + ?Sized> PersistentStore for Arc<S> {
    fn load(&self, key: &str) -> Option<String> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) {
        (**self).save(key, value)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key)
    }
}
