//! Namespaced key/value cache
//!
//! `Cache` is the generic front end: it normalizes namespaces, validates
//! names and builds entry-level operations on top of a pluggable
//! [`CacheBackend`]. [`FilesystemCache`] is the bundled backend.
//!
//! # Addressing
//!
//! | Level | Meaning |
//! |-------|---------|
//! | namespace | first-level group, `__default__` when none is given |
//! | key | entry inside a namespace, holds a set of named streams |
//! | stream | one named byte stream of a key |
//!
//! Entries written with [`Cache::set`] carry two streams: `data` and a JSON
//! `metadata` record.

mod backend;
mod filesystem;
mod metadata;
mod names;

pub use backend::CacheBackend;
pub use filesystem::FilesystemCache;
pub use metadata::{EntryMetadata, DATA_STREAM, METADATA_STREAM};
pub use names::{validate_namespace, CONFIG_MARKER, DEFAULT_NAMESPACE};

use crate::error::{CacheError, CacheResult};
use crate::fs::{FileSystemClient, FsStream, LocalFsClient, OpenMode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{Read, Write};
use tracing::{debug, info};

/// Key count of one namespace, as reported by [`Cache::describe`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamespaceSummary {
    pub namespace: String,
    pub keys: usize,
}

/// Cache front end over a storage backend
#[derive(Debug)]
pub struct Cache<B: CacheBackend = FilesystemCache> {
    backend: B,
}

impl Cache<FilesystemCache<LocalFsClient>> {
    /// Open or initialize a cache on the local disk
    pub fn local(root: impl Into<String>) -> CacheResult<Self> {
        Ok(Self::new(FilesystemCache::local(root)?))
    }
}

impl<F: FileSystemClient> Cache<FilesystemCache<F>> {
    /// Open or initialize a cache rooted at `root` on `fs`
    pub fn filesystem(root: impl Into<String>, fs: F) -> CacheResult<Self> {
        Ok(Self::new(FilesystemCache::new(root, fs)?))
    }
}

impl<B: CacheBackend> Cache<B> {
    /// Wrap an already prepared backend
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    // Lifecycle

    pub fn connect(&mut self) -> CacheResult<()> {
        self.backend.connect()
    }

    pub fn is_connected(&self) -> bool {
        self.backend.is_connected()
    }

    pub fn disconnect(&mut self) -> CacheResult<()> {
        self.backend.disconnect()
    }

    // Namespaces

    /// List namespaces in backend order
    pub fn namespaces(&self) -> CacheResult<Vec<String>> {
        self.backend.namespaces()
    }

    pub fn has_namespace(&self, namespace: Option<&str>) -> CacheResult<bool> {
        let namespace = self.backend.normalize_namespace(namespace)?;
        self.backend.has_namespace(&namespace)
    }

    /// Remove a namespace with all of its keys
    pub fn remove_namespace(&self, namespace: Option<&str>) -> CacheResult<()> {
        let namespace = self.backend.normalize_namespace(namespace)?;
        self.backend.remove_namespace(&namespace)?;
        info!("Removed namespace {}", namespace);
        Ok(())
    }

    // Keys

    /// List keys of a namespace in backend order
    pub fn keys(&self, namespace: Option<&str>) -> CacheResult<Vec<String>> {
        let namespace = self.backend.normalize_namespace(namespace)?;
        self.backend.keys(&namespace)
    }

    pub fn has_key(&self, key: &str, namespace: Option<&str>) -> CacheResult<bool> {
        let (namespace, key) = self.address(key, namespace)?;
        self.backend.has_key(&namespace, key)
    }

    /// Remove a key with all of its streams
    pub fn remove_key(&self, key: &str, namespace: Option<&str>) -> CacheResult<()> {
        let (namespace, key) = self.address(key, namespace)?;
        self.backend.remove_key(&namespace, key)?;
        debug!("Removed key {}/{}", namespace, key);
        Ok(())
    }

    /// Open a named stream of a key
    ///
    /// With `create` the key is created first. Without it a missing key or
    /// stream surfaces as the backend's not-found error. The caller owns the
    /// returned handle.
    pub fn open_stream(
        &self,
        key: &str,
        namespace: Option<&str>,
        stream: &str,
        mode: OpenMode,
        create: bool,
    ) -> CacheResult<Box<dyn FsStream>> {
        let (namespace, key) = self.address(key, namespace)?;
        names::validate_stream(stream)?;
        debug!("Opening {}/{}/{} ({})", namespace, key, stream, mode);
        self.backend.open_stream(&namespace, key, stream, mode, create)
    }

    // Entries

    /// Store `value` under `key`
    pub fn set(&self, key: &str, value: &[u8], namespace: Option<&str>) -> CacheResult<()> {
        self.set_with_metadata(key, value, namespace, BTreeMap::new())
    }

    /// Store `value` under `key` with caller annotations in its metadata
    pub fn set_with_metadata(
        &self,
        key: &str,
        value: &[u8],
        namespace: Option<&str>,
        extra: BTreeMap<String, String>,
    ) -> CacheResult<()> {
        let mut data = self.open_stream(key, namespace, DATA_STREAM, OpenMode::WRITE_BINARY, true)?;
        data.write_all(value)?;
        data.flush()?;
        drop(data);

        let metadata = EntryMetadata::new(value.len() as u64, extra);
        let mut fh = self.open_stream(key, namespace, METADATA_STREAM, OpenMode::WRITE, true)?;
        fh.write_all(serde_json::to_string_pretty(&metadata)?.as_bytes())?;
        fh.flush()?;

        debug!("Stored {} bytes under {}", value.len(), key);
        Ok(())
    }

    /// Read the value stored under `key`
    pub fn get(&self, key: &str, namespace: Option<&str>) -> CacheResult<Vec<u8>> {
        self.ensure_key(key, namespace)?;
        let mut value = Vec::new();
        self.open_stream(key, namespace, DATA_STREAM, OpenMode::READ_BINARY, false)?
            .read_to_end(&mut value)?;
        Ok(value)
    }

    /// Store `value` as JSON under `key`
    pub fn set_json<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        namespace: Option<&str>,
    ) -> CacheResult<()> {
        self.set(key, &serde_json::to_vec(value)?, namespace)
    }

    /// Read a JSON value stored under `key`
    pub fn get_json<T: DeserializeOwned>(
        &self,
        key: &str,
        namespace: Option<&str>,
    ) -> CacheResult<T> {
        Ok(serde_json::from_slice(&self.get(key, namespace)?)?)
    }

    /// Read the metadata record of an entry
    pub fn metadata(&self, key: &str, namespace: Option<&str>) -> CacheResult<EntryMetadata> {
        self.ensure_key(key, namespace)?;
        let mut raw = Vec::new();
        self.open_stream(key, namespace, METADATA_STREAM, OpenMode::READ, false)?
            .read_to_end(&mut raw)?;
        Ok(serde_json::from_slice(&raw)?)
    }

    /// Key counts of every namespace, sorted by namespace
    pub fn describe(&self) -> CacheResult<Vec<NamespaceSummary>> {
        let mut namespaces = self.namespaces()?;
        namespaces.sort();
        namespaces
            .into_iter()
            .map(|namespace| -> CacheResult<NamespaceSummary> {
                let keys = self.backend.keys(&namespace)?.len();
                Ok(NamespaceSummary { namespace, keys })
            })
            .collect()
    }

    /// Remove every namespace, keeping the cache initialized
    pub fn clear(&self) -> CacheResult<usize> {
        let namespaces = self.namespaces()?;
        for namespace in &namespaces {
            self.backend.remove_namespace(namespace)?;
        }
        info!("Cleared {} namespace(s)", namespaces.len());
        Ok(namespaces.len())
    }

    fn address<'k>(&self, key: &'k str, namespace: Option<&str>) -> CacheResult<(String, &'k str)> {
        let namespace = self.backend.normalize_namespace(namespace)?;
        names::validate_key(key)?;
        Ok((namespace, key))
    }

    fn ensure_key(&self, key: &str, namespace: Option<&str>) -> CacheResult<()> {
        let (namespace, key) = self.address(key, namespace)?;
        if !self.backend.has_key(&namespace, key)? {
            return Err(CacheError::KeyNotFound {
                namespace,
                key: key.to_string(),
            });
        }
        Ok(())
    }
}
