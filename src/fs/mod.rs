//! Filesystem client abstraction
//!
//! Provides the capability set the cache is written against. Any backend
//! that can compose paths, inspect and create directories, delete trees and
//! open byte streams can serve as cache storage:
//! - `LocalFsClient`: the local disk (default)
//! - `MemoryFsClient`: an in-process tree, shared between clones

mod local;
mod memory;

pub use local::LocalFsClient;
pub use memory::MemoryFsClient;

use crate::error::CacheError;
use std::fmt;
use std::io::{self, Read, Write};
use std::str::FromStr;

/// A readable/writable handle returned by [`FileSystemClient::open`]
///
/// The caller owns the handle and closes it by dropping it.
pub trait FsStream: Read + Write + Send {}

impl<T: Read + Write + Send> FsStream for T {}

/// Abstract filesystem client interface
///
/// Paths are plain strings composed with [`path_join`](Self::path_join) so
/// that remote backends can use their own separator conventions. Missing
/// paths are reported as `io::ErrorKind::NotFound`.
pub trait FileSystemClient: fmt::Debug + Send + Sync {
    /// Compose a path from its parts. Performs no I/O.
    fn path_join(&self, parts: &[&str]) -> String;

    /// Check whether anything exists at `path`
    fn exists(&self, path: &str) -> io::Result<bool>;

    /// Check whether `path` is a directory
    fn isdir(&self, path: &str) -> io::Result<bool>;

    /// List the entry names of a directory
    fn listdir(&self, path: &str) -> io::Result<Vec<String>>;

    /// Create a directory, optionally creating missing parents
    ///
    /// With `recursive` an existing directory is not an error. An existing
    /// non-directory always is.
    fn mkdir(&self, path: &str, recursive: bool) -> io::Result<()>;

    /// Delete a file, or a whole directory tree when `recursive` is set
    fn remove(&self, path: &str, recursive: bool) -> io::Result<()>;

    /// Open a stream at `path`
    fn open(&self, path: &str, mode: OpenMode) -> io::Result<Box<dyn FsStream>>;

    /// Establish the underlying connection, if the backend has one
    fn connect(&mut self) -> io::Result<()>;

    /// Whether the backend is currently connected
    fn is_connected(&self) -> bool;

    /// Tear down the underlying connection
    fn disconnect(&mut self) -> io::Result<()>;
}

/// How a stream is accessed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Access {
    /// Read an existing stream
    #[default]
    Read,
    /// Create or truncate, then write
    Write,
    /// Create if missing, then write after existing content
    Append,
}

/// Stream open mode: access plus text/binary flag
///
/// Backends that translate text (newlines, encodings) honor `binary`; the
/// bundled backends store bytes as written in both modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpenMode {
    pub access: Access,
    pub binary: bool,
}

impl OpenMode {
    pub const READ: Self = Self::new(Access::Read, false);
    pub const READ_BINARY: Self = Self::new(Access::Read, true);
    pub const WRITE: Self = Self::new(Access::Write, false);
    pub const WRITE_BINARY: Self = Self::new(Access::Write, true);
    pub const APPEND: Self = Self::new(Access::Append, false);
    pub const APPEND_BINARY: Self = Self::new(Access::Append, true);

    pub const fn new(access: Access, binary: bool) -> Self {
        Self { access, binary }
    }

    /// Whether the mode can modify the stream
    pub fn is_write(&self) -> bool {
        matches!(self.access, Access::Write | Access::Append)
    }
}

impl FromStr for OpenMode {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let access = match chars.next() {
            Some('r') => Access::Read,
            Some('w') => Access::Write,
            Some('a') => Access::Append,
            _ => return Err(CacheError::InvalidMode(s.to_string())),
        };
        let binary = match chars.as_str() {
            "" | "t" => false,
            "b" => true,
            _ => return Err(CacheError::InvalidMode(s.to_string())),
        };
        Ok(Self { access, binary })
    }
}

impl fmt::Display for OpenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let access = match self.access {
            Access::Read => "r",
            Access::Write => "w",
            Access::Append => "a",
        };
        write!(f, "{}{}", access, if self.binary { "b" } else { "" })
    }
}
