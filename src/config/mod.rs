//! Settings for the fscache CLI
//!
//! The cache root carries its own marker ([`CacheConfig`]). The CLI also
//! reads an optional settings file that names the root and a default
//! namespace. It lives under the platform config dir unless `--config` or
//! `FSCACHE_CONFIG` point elsewhere.

pub mod schema;

pub use schema::{CacheConfig, Settings, CURRENT_VERSION};

use crate::cache::validate_namespace;
use crate::error::{CacheError, CacheResult};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Log formats accepted in `[general] log_format`
pub const LOG_FORMATS: &[&str] = &["text", "json"];

/// Reads and writes the settings file
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Use `explicit` when given, otherwise the platform location
    pub fn locate(explicit: Option<PathBuf>) -> Self {
        Self::at(explicit.unwrap_or_else(Self::default_config_path))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/fscache/config.toml`
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fscache")
            .join("config.toml")
    }

    /// `<cache dir>/fscache`
    pub fn default_cache_root() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fscache")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read and validate the settings file
    ///
    /// A missing or blank file yields the defaults.
    pub fn load(&self) -> CacheResult<Settings> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No settings at {}, using defaults", self.path.display());
                return Ok(Settings::default());
            }
            Err(e) => {
                return Err(CacheError::io(
                    format!("reading settings from {}", self.path.display()),
                    e,
                ))
            }
        };

        if content.trim().is_empty() {
            return Ok(Settings::default());
        }

        let settings: Settings =
            toml::from_str(&content).map_err(|e| self.invalid(&e.to_string()))?;
        self.check(&settings)?;
        Ok(settings)
    }

    /// Write settings, replacing the file in one rename
    pub fn save(&self, settings: &Settings) -> CacheResult<()> {
        self.check(settings)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| CacheError::io(format!("creating {}", parent.display()), e))?;
        }

        let staged = self.path.with_extension("toml.tmp");
        fs::write(&staged, toml::to_string_pretty(settings)?)
            .map_err(|e| CacheError::io(format!("writing {}", staged.display()), e))?;
        fs::rename(&staged, &self.path)
            .map_err(|e| CacheError::io(format!("replacing {}", self.path.display()), e))?;

        info!("Settings saved to {}", self.path.display());
        Ok(())
    }

    fn check(&self, settings: &Settings) -> CacheResult<()> {
        let format = settings.general.log_format.as_str();
        if !LOG_FORMATS.contains(&format) {
            return Err(self.invalid(&format!(
                "log_format must be one of {}, got '{}'",
                LOG_FORMATS.join(", "),
                format
            )));
        }
        if let Some(namespace) = &settings.cache.namespace {
            validate_namespace(namespace).map_err(|e| self.invalid(&e.to_string()))?;
        }
        Ok(())
    }

    fn invalid(&self, reason: &str) -> CacheError {
        CacheError::ConfigInvalid {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::locate(None)
    }
}
