//! Cache storage backend abstraction
//!
//! `Cache` holds one backend and forwards namespace/key primitives to it.
//! Names arrive already normalized and validated.

use crate::cache::names::{validate_namespace, DEFAULT_NAMESPACE};
use crate::error::CacheResult;
use crate::fs::{FsStream, OpenMode};
use std::fmt;

/// Storage primitives a cache needs
pub trait CacheBackend: fmt::Debug {
    /// Connect the underlying storage
    fn connect(&mut self) -> CacheResult<()>;

    /// Whether the underlying storage is connected
    fn is_connected(&self) -> bool;

    /// Disconnect the underlying storage
    fn disconnect(&mut self) -> CacheResult<()>;

    /// Map an optional caller namespace to the stored namespace name
    fn normalize_namespace(&self, namespace: Option<&str>) -> CacheResult<String> {
        match namespace {
            None => Ok(DEFAULT_NAMESPACE.to_string()),
            Some(name) => {
                validate_namespace(name)?;
                Ok(name.to_string())
            }
        }
    }

    /// List stored namespaces, in backend order
    fn namespaces(&self) -> CacheResult<Vec<String>>;

    /// Check whether a namespace exists
    fn has_namespace(&self, namespace: &str) -> CacheResult<bool>;

    /// Remove a namespace and everything under it
    fn remove_namespace(&self, namespace: &str) -> CacheResult<()>;

    /// List keys of a namespace, in backend order
    fn keys(&self, namespace: &str) -> CacheResult<Vec<String>>;

    /// Check whether a key exists
    fn has_key(&self, namespace: &str, key: &str) -> CacheResult<bool>;

    /// Remove a key and all of its streams
    fn remove_key(&self, namespace: &str, key: &str) -> CacheResult<()>;

    /// Open a named stream of a key, creating the key first when `create` is set
    fn open_stream(
        &self,
        namespace: &str,
        key: &str,
        stream: &str,
        mode: OpenMode,
        create: bool,
    ) -> CacheResult<Box<dyn FsStream>>;
}
