//! In-memory storage

use std::cell::RefCell;

use rustc_hash::FxHashMap;

use super::{Persister, StorageError, validate_key};

/// Volatile [`Persister`] for tests and sessions that should not touch disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: RefCell<FxHashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a key currently holds a value.
    pub fn contains(&self, key: &str) -> bool {
        self.slots.borrow().contains_key(key)
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    /// Whether every slot is empty.
    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }
}

impl Persister for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;

        Ok(self.slots.borrow().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;

        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;

        self.slots.borrow_mut().remove(key);

        Ok(())
    }
}
