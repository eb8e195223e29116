use std::collections::HashMap;
use std::sync::RwLock;

use super::{DurableStore, StorageError};

/// In-memory durable store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    slots: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DurableStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let slots = self.slots.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut slots = self.slots.write().map_err(|_| StorageError::LockPoisoned)?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_slot_reads_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn set_then_get_round_trips() {
        let store = MemoryStore::new();
        store.set("slot", r#"{"a":1}"#).unwrap();
        assert_eq!(store.get("slot").unwrap().as_deref(), Some(r#"{"a":1}"#));
    }

    #[test]
    fn set_replaces_previous_value() {
        let store = MemoryStore::new();
        store.set("slot", "v1").unwrap();
        store.set("slot", "v2").unwrap();
        assert_eq!(store.get("slot").unwrap().as_deref(), Some("v2"));
    }
}
