pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// Opaque durable key-value blob store.
///
/// Used for notification/alert persistence and the demo dataset snapshot.
/// Blobs are JSON documents; the store itself is medium-agnostic.
pub trait DurableStore: Send + Sync {
    /// Read a slot. `None` means the slot was never written.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a slot, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
