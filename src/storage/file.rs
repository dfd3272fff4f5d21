//! File-backed storage

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::{trace, warn};

use super::{Persister, StorageError, validate_key};

/// Durable [`Persister`] keeping one `<key>.json` file per slot in a directory.
///
/// Writes go to a temporary sibling file which is then renamed over the slot,
/// so a crash mid-write leaves either the old or the new value.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`. The directory is created lazily on the
    /// first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory holding the slot files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`] for keys that are not plain names.
    pub fn slot_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;

        Ok(self.root.join(format!("{key}.json")))
    }
}

impl Persister for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(key)?;

        match fs::read(&path) {
            Ok(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|_utf8| StorageError::NotUtf8(key.to_string())),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;

        fs::create_dir_all(&self.root).map_err(|source| StorageError::Io {
            path: self.root.clone(),
            source,
        })?;

        let tmp = path.with_extension("json.tmp");

        fs::write(&tmp, value).map_err(|source| StorageError::Io {
            path: tmp.clone(),
            source,
        })?;

        if let Err(source) = fs::rename(&tmp, &path) {
            if let Err(error) = fs::remove_file(&tmp) {
                warn!(path = %tmp.display(), %error, "failed to remove temporary slot file");
            }

            return Err(StorageError::Io { path, source });
        }

        trace!(path = %path.display(), bytes = value.len(), "wrote slot");

        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }
}
