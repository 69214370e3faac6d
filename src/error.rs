//! Error types for fscache
//!
//! All modules use `CacheResult<T>` as their return type.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// All errors that can occur in fscache
#[derive(Error, Debug)]
pub enum CacheError {
    // Cache root errors
    #[error("Path nominated for cache ({path}) has a corrupt configuration: {reason}")]
    CorruptCache { path: String, reason: String },

    #[error("Path nominated for cache ({0}) is not a directory")]
    InvalidLocation(String),

    #[error("Cache directory ({0}) needs to be initialised, and is not empty")]
    UninitializedNonEmpty(String),

    // Addressing errors
    #[error("Invalid {kind} name '{name}': {reason}")]
    InvalidName {
        kind: &'static str,
        name: String,
        reason: &'static str,
    },

    #[error("Invalid open mode '{0}'. Expected one of r, rb, rt, w, wb, wt, a, ab, at")]
    InvalidMode(String),

    #[error("Key not found: {key} (namespace {namespace})")]
    KeyNotFound { namespace: String, key: String },

    // Backend errors, passed through unchanged
    #[error(transparent)]
    Storage(#[from] io::Error),

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    // Settings errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl CacheError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create an invalid name error
    pub fn invalid_name(
        kind: &'static str,
        name: impl Into<String>,
        reason: &'static str,
    ) -> Self {
        Self::InvalidName {
            kind,
            name: name.into(),
            reason,
        }
    }

    /// Check whether the backend reported a missing path
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Storage(e) | Self::Io { source: e, .. } => e.kind() == io::ErrorKind::NotFound,
            Self::KeyNotFound { .. } => true,
            _ => false,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::CorruptCache { .. } => {
                Some("Manually empty or delete the cache path, and try again")
            }
            Self::InvalidLocation(_) => Some("Choose a path that is a directory or does not exist"),
            Self::UninitializedNonEmpty(_) => {
                Some("Manually delete and/or empty this path, or pick another cache root")
            }
            Self::InvalidMode(_) => Some("Use r/w/a, optionally suffixed with b or t"),
            _ => None,
        }
    }
}
