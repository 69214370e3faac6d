//! Reserved names and name validation
//!
//! Namespaces, keys and stream names each become one path component under
//! the cache root, so they must not smuggle separators or relative hops.

use crate::error::{CacheError, CacheResult};

/// Namespace used when the caller gives none
pub const DEFAULT_NAMESPACE: &str = "__default__";

/// Name of the config marker inside the cache root
pub const CONFIG_MARKER: &str = "config";

/// Validate a caller-supplied namespace
pub fn validate_namespace(name: &str) -> CacheResult<()> {
    validate_component("namespace", name)?;
    if name == CONFIG_MARKER {
        return Err(CacheError::invalid_name(
            "namespace",
            name,
            "reserved for the cache config marker",
        ));
    }
    Ok(())
}

/// Validate a key name
pub fn validate_key(name: &str) -> CacheResult<()> {
    validate_component("key", name)
}

/// Validate a stream name
pub fn validate_stream(name: &str) -> CacheResult<()> {
    validate_component("stream", name)
}

fn validate_component(kind: &'static str, name: &str) -> CacheResult<()> {
    let reason = if name.is_empty() {
        "must not be empty"
    } else if name == "." || name == ".." {
        "must not be a relative path component"
    } else if name.contains(['/', '\\']) {
        "must not contain path separators"
    } else if name.contains('\0') {
        "must not contain NUL bytes"
    } else {
        return Ok(());
    };
    Err(CacheError::invalid_name(kind, name, reason))
}
