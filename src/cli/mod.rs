//! Command-line interface

pub mod args;
pub mod commands;

pub use args::{Cli, Commands};

use crate::cache::{Cache, FilesystemCache};
use crate::config::{ConfigManager, Settings};
use crate::error::CacheResult;
use std::path::{Path, PathBuf};

/// Local-disk cache as used by the CLI
pub type LocalCache = Cache<FilesystemCache>;

/// Resolved settings shared by every command
pub struct Context {
    pub manager: ConfigManager,
    pub settings: Settings,
    root: PathBuf,
}

impl Context {
    /// Resolve the cache root: flag or env, then settings, then platform default
    pub fn new(root: Option<PathBuf>, manager: ConfigManager, settings: Settings) -> Self {
        let root = root
            .or_else(|| settings.cache.root.clone())
            .unwrap_or_else(ConfigManager::default_cache_root);
        Self {
            manager,
            settings,
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Open the cache, initializing the root on first use
    pub fn open_cache(&self) -> CacheResult<LocalCache> {
        Cache::local(self.root.to_string_lossy())
    }

    /// Namespace for a command: explicit argument, then settings
    pub fn namespace<'a>(&'a self, explicit: Option<&'a str>) -> Option<&'a str> {
        explicit.or(self.settings.cache.namespace.as_deref())
    }
}
