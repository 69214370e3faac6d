//! fscache - Namespaced filesystem cache
//!
//! Persists namespaced entries, each a bundle of named byte streams, to any
//! storage that implements [`fs::FileSystemClient`]. A cache root is stamped
//! with a config marker on first use and validated on every open.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod fs;
pub mod ui;

pub use cache::{Cache, CacheBackend, FilesystemCache};
pub use error::{CacheError, CacheResult};
pub use fs::{FileSystemClient, LocalFsClient, MemoryFsClient, OpenMode};
