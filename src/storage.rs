//! Storage
//!
//! A small key-value abstraction standing in for the browser's local storage:
//! every component owns one named slot and reads or writes it as a string.

use std::{io, path::PathBuf};

use thiserror::Error;

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors raised by a [`Persister`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// Keys must be non-empty and use only ASCII letters, digits, `-` or `_`.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// An I/O operation on the backing file failed.
    #[error("storage I/O failed for {path}: {source}")]
    Io {
        /// File being accessed.
        path: PathBuf,

        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The stored bytes were not valid UTF-8.
    #[error("stored value for {0:?} is not valid UTF-8")]
    NotUtf8(String),
}

/// Key-value slot storage.
///
/// All methods take `&self`; implementations use interior mutability.
pub trait Persister {
    /// Read a value. `Ok(None)` when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or replace a value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be written.
    fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be written.
    fn delete(&self, key: &str) -> Result<(), StorageError>;
}

impl<P: Persister + ?Sized> Persister for &P {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).put(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        (**self).delete(key)
    }
}

pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
