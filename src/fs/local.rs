//! Local disk filesystem client

use super::{Access, FileSystemClient, FsStream, OpenMode};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Filesystem client backed by `std::fs`
///
/// The local disk needs no session, so the connection state is only
/// reported, never required.
#[derive(Debug, Clone)]
pub struct LocalFsClient {
    connected: bool,
}

impl LocalFsClient {
    /// Create a new local client
    pub fn new() -> Self {
        Self { connected: true }
    }
}

impl Default for LocalFsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystemClient for LocalFsClient {
    fn path_join(&self, parts: &[&str]) -> String {
        let path: PathBuf = parts.iter().collect();
        path.to_string_lossy().into_owned()
    }

    fn exists(&self, path: &str) -> io::Result<bool> {
        match Path::new(path).try_exists() {
            Err(_) if below_file(Path::new(path)) => Ok(false),
            other => other,
        }
    }

    fn isdir(&self, path: &str) -> io::Result<bool> {
        match fs::metadata(path) {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(_) if below_file(Path::new(path)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn listdir(&self, path: &str) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(path)? {
            names.push(entry?.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }

    fn mkdir(&self, path: &str, recursive: bool) -> io::Result<()> {
        debug!("mkdir {} (recursive: {})", path, recursive);
        if recursive {
            fs::create_dir_all(path)
        } else {
            fs::create_dir(path)
        }
    }

    fn remove(&self, path: &str, recursive: bool) -> io::Result<()> {
        debug!("remove {} (recursive: {})", path, recursive);
        let meta = fs::symlink_metadata(path)?;
        if !meta.is_dir() {
            fs::remove_file(path)
        } else if recursive {
            fs::remove_dir_all(path)
        } else {
            fs::remove_dir(path)
        }
    }

    fn open(&self, path: &str, mode: OpenMode) -> io::Result<Box<dyn FsStream>> {
        let mut options = OpenOptions::new();
        match mode.access {
            Access::Read => options.read(true),
            Access::Write => options.write(true).create(true).truncate(true),
            Access::Append => options.append(true).create(true),
        };
        let file = options.open(path)?;
        Ok(Box::new(file))
    }

    fn connect(&mut self) -> io::Result<()> {
        debug!("Local filesystem connected");
        self.connected = true;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn disconnect(&mut self) -> io::Result<()> {
        debug!("Local filesystem disconnected");
        self.connected = false;
        Ok(())
    }
}

/// A path nested under a regular file cannot exist (ENOTDIR)
fn below_file(path: &Path) -> bool {
    path.ancestors().skip(1).any(Path::is_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use tempfile::TempDir;

    fn root(temp: &TempDir) -> String {
        temp.path().to_string_lossy().into_owned()
    }

    #[test]
    fn join_uses_platform_separator() {
        let fs = LocalFsClient::new();
        let joined = fs.path_join(&["a", "b", "c"]);
        assert_eq!(PathBuf::from(&joined), Path::new("a").join("b").join("c"));
    }

    #[test]
    fn exists_and_isdir() {
        let temp = TempDir::new().unwrap();
        let fs = LocalFsClient::new();
        let file = fs.path_join(&[&root(&temp), "file"]);
        std::fs::write(&file, b"x").unwrap();

        assert!(fs.exists(&root(&temp)).unwrap());
        assert!(fs.isdir(&root(&temp)).unwrap());
        assert!(fs.exists(&file).unwrap());
        assert!(!fs.isdir(&file).unwrap());
        assert!(!fs.isdir(&fs.path_join(&[&root(&temp), "missing"])).unwrap());

        let under_file = fs.path_join(&[&file, "config"]);
        assert!(!fs.exists(&under_file).unwrap());
        assert!(!fs.isdir(&under_file).unwrap());
    }

    #[test]
    fn mkdir_recursive_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let fs = LocalFsClient::new();
        let nested = fs.path_join(&[&root(&temp), "a", "b"]);

        fs.mkdir(&nested, true).unwrap();
        fs.mkdir(&nested, true).unwrap();
        assert!(fs.isdir(&nested).unwrap());

        let err = fs.mkdir(&nested, false).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
    }

    #[test]
    fn mkdir_over_file_fails() {
        let temp = TempDir::new().unwrap();
        let fs = LocalFsClient::new();
        let file = fs.path_join(&[&root(&temp), "file"]);
        std::fs::write(&file, b"x").unwrap();

        assert!(fs.mkdir(&file, true).is_err());
    }

    #[test]
    fn remove_tree_and_missing() {
        let temp = TempDir::new().unwrap();
        let fs = LocalFsClient::new();
        let dir = fs.path_join(&[&root(&temp), "a"]);
        fs.mkdir(&fs.path_join(&[&dir, "b"]), true).unwrap();

        assert!(fs.remove(&dir, false).is_err());
        fs.remove(&dir, true).unwrap();
        assert!(!fs.exists(&dir).unwrap());

        let err = fs.remove(&dir, true).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn listdir_missing_is_not_found() {
        let temp = TempDir::new().unwrap();
        let fs = LocalFsClient::new();
        let err = fs.listdir(&fs.path_join(&[&root(&temp), "nope"])).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn write_append_read() {
        let temp = TempDir::new().unwrap();
        let fs = LocalFsClient::new();
        let path = fs.path_join(&[&root(&temp), "stream"]);

        fs.open(&path, OpenMode::WRITE_BINARY)
            .unwrap()
            .write_all(b"hello")
            .unwrap();
        fs.open(&path, OpenMode::APPEND_BINARY)
            .unwrap()
            .write_all(b" world")
            .unwrap();

        let mut content = String::new();
        fs.open(&path, OpenMode::READ)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "hello world");
        assert_eq!(fs.listdir(&root(&temp)).unwrap(), vec!["stream"]);
    }

    #[test]
    fn connection_state_is_reported() {
        let mut fs = LocalFsClient::new();
        assert!(fs.is_connected());
        fs.disconnect().unwrap();
        assert!(!fs.is_connected());
        fs.connect().unwrap();
        assert!(fs.is_connected());
    }
}
