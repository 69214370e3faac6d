//! Configuration schema for fscache
//!
//! Two records live here:
//! - `CacheConfig`: the marker stamped into every cache root at `<root>/config`
//! - `Settings`: CLI settings stored at `~/.config/fscache/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Marker format version written by this crate
pub const CURRENT_VERSION: u32 = 1;

/// Config marker of an initialized cache root
///
/// Parsing is strict: the record must be valid TOML and carry `version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Format version of the cache layout
    pub version: u32,
}

impl CacheConfig {
    /// Parse a marker record
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize the marker record
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
        }
    }
}

/// Root CLI settings structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// General settings
    pub general: GeneralSettings,

    /// Cache location settings
    pub cache: CacheSettings,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Where the CLI finds its cache
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Cache root (defaults to the platform cache dir)
    pub root: Option<PathBuf>,

    /// Namespace used when a command gets none
    pub namespace: Option<String>,
}
