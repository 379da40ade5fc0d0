//! Client-local persistence for keyed JSON blobs.
//!
//! Cart contents and pending verification credits live outside the remote
//! store, in simple keyed blobs with no versioning. Reads are tolerant: a
//! missing or corrupt blob is treated as absent (the storefront must keep
//! working after a bad write or a schema change). Writes surface errors.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::warn;

/// Well-known blob keys.
pub mod keys {
    /// Cart contents (a list of cart lines).
    pub const CART: &str = "cart";
    /// Deferred verification awards for signed-out scans.
    pub const PENDING_CREDITS: &str = "pending-credits";
}

/// Errors from client-local persistence.
#[derive(Debug, Error)]
pub enum LocalStoreError {
    #[error("I/O error for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize blob {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Keyed blob storage surviving a client restart.
///
/// Implementations only deal in raw strings so the trait stays object-safe;
/// typed access goes through [`load`](dyn LocalStore::load) and
/// [`save`](dyn LocalStore::save) on `dyn LocalStore`.
pub trait LocalStore: Send + Sync {
    /// Read the raw blob for `key`, `None` if absent.
    fn load_raw(&self, key: &str) -> Result<Option<String>, LocalStoreError>;

    /// Write the raw blob for `key`.
    fn save_raw(&self, key: &str, value: &str) -> Result<(), LocalStoreError>;

    /// Remove the blob for `key`; removing an absent key is a no-op.
    fn remove(&self, key: &str) -> Result<(), LocalStoreError>;
}

impl dyn LocalStore {
    /// Load and decode a blob; absent or corrupt blobs yield `None`.
    ///
    /// # Errors
    ///
    /// Returns `LocalStoreError` only for I/O failures, never for decode
    /// failures (those are logged and treated as absent).
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, LocalStoreError> {
        let Some(raw) = self.load_raw(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key, error = %e, "discarding corrupt local blob");
                Ok(None)
            }
        }
    }

    /// Encode and write a blob.
    ///
    /// # Errors
    ///
    /// Returns `LocalStoreError` if encoding or the write fails.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), LocalStoreError> {
        let raw = serde_json::to_string(value).map_err(|source| LocalStoreError::Serialize {
            key: key.to_owned(),
            source,
        })?;
        self.save_raw(key, &raw)
    }
}

/// File-backed store: one `{key}.json` file per key under a data directory.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl LocalStore for JsonFileStore {
    fn load_raw(&self, key: &str) -> Result<Option<String>, LocalStoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(LocalStoreError::Io {
                key: key.to_owned(),
                source,
            }),
        }
    }

    fn save_raw(&self, key: &str, value: &str) -> Result<(), LocalStoreError> {
        let io_err = |source| LocalStoreError::Io {
            key: key.to_owned(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(io_err)?;
        fs::write(self.path_for(key), value).map_err(|source| LocalStoreError::Io {
            key: key.to_owned(),
            source,
        })
    }

    fn remove(&self, key: &str) -> Result<(), LocalStoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(LocalStoreError::Io {
                key: key.to_owned(),
                source,
            }),
        }
    }
}

/// In-memory store for tests and embedders without a durable data dir.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn blobs(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.blobs.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl LocalStore for MemoryStore {
    fn load_raw(&self, key: &str) -> Result<Option<String>, LocalStoreError> {
        Ok(self.blobs().get(key).cloned())
    }

    fn save_raw(&self, key: &str, value: &str) -> Result<(), LocalStoreError> {
        self.blobs().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), LocalStoreError> {
        self.blobs().remove(key);
        Ok(())
    }
}
