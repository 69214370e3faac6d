//! Filesystem-backed cache storage
//!
//! # Layout
//!
//! ```text
//! <root>/
//!   config                # marker: version = 1
//!   <namespace>/
//!     <key>/
//!       <stream>          # arbitrary bytes
//! ```
//!
//! A key is a directory, so one key can carry several named streams.
//!
//! # Initialization
//!
//! The root is validated when the cache is built. An existing marker is
//! parsed and adopted; otherwise the root must be missing (it is created) or
//! an empty directory, and the marker is written. Anything else is refused
//! without touching the directory.

use crate::cache::backend::CacheBackend;
use crate::cache::names::CONFIG_MARKER;
use crate::config::{CacheConfig, CURRENT_VERSION};
use crate::error::{CacheError, CacheResult};
use crate::fs::{FileSystemClient, FsStream, LocalFsClient, OpenMode};
use std::io::{Read, Write};
use tracing::{debug, info, warn};

/// Cache backend storing namespaces and keys as directories
#[derive(Debug)]
pub struct FilesystemCache<F: FileSystemClient = LocalFsClient> {
    fs: F,
    root: String,
    config: CacheConfig,
}

impl FilesystemCache<LocalFsClient> {
    /// Open or initialize a cache on the local disk
    pub fn local(root: impl Into<String>) -> CacheResult<Self> {
        Self::new(root, LocalFsClient::new())
    }
}

impl<F: FileSystemClient> FilesystemCache<F> {
    /// Open or initialize a cache rooted at `root` on `fs`
    pub fn new(root: impl Into<String>, fs: F) -> CacheResult<Self> {
        let root = root.into();
        let config = prepare(&fs, &root)?;
        debug!("Cache at {} ready (version {})", root, config.version);
        Ok(Self { fs, root, config })
    }

    /// The cache root path
    pub fn root(&self) -> &str {
        &self.root
    }

    /// The active config marker
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// The underlying filesystem client
    pub fn fs(&self) -> &F {
        &self.fs
    }

    fn path(&self, parts: &[&str]) -> String {
        let mut all = Vec::with_capacity(parts.len() + 1);
        all.push(self.root.as_str());
        all.extend_from_slice(parts);
        self.fs.path_join(&all)
    }
}

/// Validate or initialize the cache root, returning its config marker
fn prepare<F: FileSystemClient>(fs: &F, root: &str) -> CacheResult<CacheConfig> {
    let config_path = fs.path_join(&[root, CONFIG_MARKER]);

    let root_exists = fs.exists(root)?;
    if root_exists && !fs.isdir(root)? {
        return Err(CacheError::InvalidLocation(root.to_string()));
    }

    if fs.exists(&config_path)? {
        let mut raw = Vec::new();
        fs.open(&config_path, OpenMode::READ)?.read_to_end(&mut raw)?;
        let config = parse_marker(root, &raw)?;
        if config.version > CURRENT_VERSION {
            warn!(
                "Cache at {} uses format version {}, newer than {}",
                root, config.version, CURRENT_VERSION
            );
        }
        return Ok(config);
    }

    if !root_exists {
        fs.mkdir(root, true)?;
    } else if !fs.listdir(root)?.is_empty() {
        return Err(CacheError::UninitializedNonEmpty(root.to_string()));
    }

    let config = CacheConfig::default();
    let mut fh = fs.open(&config_path, OpenMode::WRITE)?;
    fh.write_all(config.to_toml()?.as_bytes())?;
    fh.flush()?;

    info!("Initialized cache at {}", root);
    Ok(config)
}

fn parse_marker(root: &str, raw: &[u8]) -> CacheResult<CacheConfig> {
    let corrupt = |reason: String| CacheError::CorruptCache {
        path: root.to_string(),
        reason,
    };
    let text = std::str::from_utf8(raw).map_err(|e| corrupt(e.to_string()))?;
    CacheConfig::parse(text).map_err(|e| corrupt(e.message().to_string()))
}

impl<F: FileSystemClient> CacheBackend for FilesystemCache<F> {
    fn connect(&mut self) -> CacheResult<()> {
        self.fs.connect()?;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.fs.is_connected()
    }

    fn disconnect(&mut self) -> CacheResult<()> {
        self.fs.disconnect()?;
        Ok(())
    }

    fn namespaces(&self) -> CacheResult<Vec<String>> {
        let mut names = self.fs.listdir(&self.root)?;
        names.retain(|name| name != CONFIG_MARKER);
        Ok(names)
    }

    fn has_namespace(&self, namespace: &str) -> CacheResult<bool> {
        Ok(self.fs.exists(&self.path(&[namespace]))?)
    }

    fn remove_namespace(&self, namespace: &str) -> CacheResult<()> {
        self.fs.remove(&self.path(&[namespace]), true)?;
        Ok(())
    }

    fn keys(&self, namespace: &str) -> CacheResult<Vec<String>> {
        Ok(self.fs.listdir(&self.path(&[namespace]))?)
    }

    fn has_key(&self, namespace: &str, key: &str) -> CacheResult<bool> {
        Ok(self.fs.exists(&self.path(&[namespace, key]))?)
    }

    fn remove_key(&self, namespace: &str, key: &str) -> CacheResult<()> {
        self.fs.remove(&self.path(&[namespace, key]), true)?;
        Ok(())
    }

    fn open_stream(
        &self,
        namespace: &str,
        key: &str,
        stream: &str,
        mode: OpenMode,
        create: bool,
    ) -> CacheResult<Box<dyn FsStream>> {
        let key_path = self.path(&[namespace, key]);
        if create {
            self.fs.mkdir(&key_path, true)?;
        }
        let stream_path = self.fs.path_join(&[&key_path, stream]);
        Ok(self.fs.open(&stream_path, mode)?)
    }
}
