//! In-memory filesystem client
//!
//! Paths are `/`-separated. Clones share the same tree, so a test can hand
//! one clone to a cache and inspect the storage through another.

use super::{Access, FileSystemClient, FsStream, OpenMode};
use std::collections::BTreeMap;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

const ROOT: &str = "/";
static ROOT_NODE: Node = Node::Dir;

#[derive(Debug, Clone)]
enum Node {
    Dir,
    File(Vec<u8>),
}

#[derive(Debug, Default)]
struct Tree {
    nodes: BTreeMap<String, Node>,
}

impl Tree {
    fn get(&self, path: &str) -> Option<&Node> {
        if path == ROOT {
            return Some(&ROOT_NODE);
        }
        self.nodes.get(path)
    }

    fn is_dir(&self, path: &str) -> bool {
        matches!(self.get(path), Some(Node::Dir))
    }

    /// Absolute paths of everything strictly below `dir`
    fn descendants(&self, dir: &str) -> Vec<String> {
        let prefix = child_prefix(dir);
        self.nodes
            .range(prefix.clone()..)
            .take_while(|(path, _)| path.starts_with(&prefix))
            .map(|(path, _)| path.clone())
            .collect()
    }

    fn ensure_parent_dir(&self, path: &str) -> io::Result<()> {
        let parent = parent(path);
        match self.get(&parent) {
            Some(Node::Dir) => Ok(()),
            Some(Node::File(_)) => Err(io::Error::other(format!("{} is not a directory", parent))),
            None => Err(not_found(&parent)),
        }
    }
}

/// Filesystem client that keeps everything in process memory
#[derive(Debug, Clone)]
pub struct MemoryFsClient {
    tree: Arc<Mutex<Tree>>,
    connected: bool,
}

impl MemoryFsClient {
    /// Create an empty, connected client
    pub fn new() -> Self {
        Self {
            tree: Arc::new(Mutex::new(Tree::default())),
            connected: true,
        }
    }

    fn tree(&self) -> io::Result<MutexGuard<'_, Tree>> {
        if !self.connected {
            return Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "memory filesystem is disconnected",
            ));
        }
        lock(&self.tree)
    }
}

impl Default for MemoryFsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystemClient for MemoryFsClient {
    fn path_join(&self, parts: &[&str]) -> String {
        let mut joined = String::new();
        for part in parts {
            if part.starts_with('/') {
                joined = part.to_string();
            } else if joined.is_empty() || joined.ends_with('/') {
                joined.push_str(part);
            } else {
                joined.push('/');
                joined.push_str(part);
            }
        }
        joined
    }

    fn exists(&self, path: &str) -> io::Result<bool> {
        Ok(self.tree()?.get(&normalize(path)).is_some())
    }

    fn isdir(&self, path: &str) -> io::Result<bool> {
        Ok(self.tree()?.is_dir(&normalize(path)))
    }

    fn listdir(&self, path: &str) -> io::Result<Vec<String>> {
        let path = normalize(path);
        let tree = self.tree()?;
        match tree.get(&path) {
            Some(Node::Dir) => {}
            Some(Node::File(_)) => {
                return Err(io::Error::other(format!("{} is not a directory", path)))
            }
            None => return Err(not_found(&path)),
        }

        let prefix = child_prefix(&path);
        Ok(tree
            .descendants(&path)
            .into_iter()
            .filter_map(|p| {
                let name = &p[prefix.len()..];
                (!name.contains('/')).then(|| name.to_string())
            })
            .collect())
    }

    fn mkdir(&self, path: &str, recursive: bool) -> io::Result<()> {
        let path = normalize(path);
        let mut tree = self.tree()?;
        debug!("mkdir {} (recursive: {})", path, recursive);

        match tree.get(&path) {
            Some(Node::Dir) if recursive => return Ok(()),
            Some(_) => {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("{} already exists", path),
                ))
            }
            None => {}
        }

        if recursive {
            for ancestor in ancestors(&path) {
                match tree.get(&ancestor) {
                    Some(Node::Dir) => {}
                    Some(Node::File(_)) => {
                        return Err(io::Error::other(format!("{} is not a directory", ancestor)))
                    }
                    None => {
                        tree.nodes.insert(ancestor, Node::Dir);
                    }
                }
            }
        } else {
            tree.ensure_parent_dir(&path)?;
        }

        tree.nodes.insert(path, Node::Dir);
        Ok(())
    }

    fn remove(&self, path: &str, recursive: bool) -> io::Result<()> {
        let path = normalize(path);
        let mut tree = self.tree()?;
        debug!("remove {} (recursive: {})", path, recursive);

        if path == ROOT {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "refusing to remove the filesystem root",
            ));
        }

        match tree.get(&path) {
            None => return Err(not_found(&path)),
            Some(Node::File(_)) => {}
            Some(Node::Dir) => {
                let below = tree.descendants(&path);
                if !below.is_empty() && !recursive {
                    return Err(io::Error::other(format!("{} is not empty", path)));
                }
                for child in below {
                    tree.nodes.remove(&child);
                }
            }
        }

        tree.nodes.remove(&path);
        Ok(())
    }

    fn open(&self, path: &str, mode: OpenMode) -> io::Result<Box<dyn FsStream>> {
        let path = normalize(path);
        let mut tree = self.tree()?;

        let content = match (mode.access, tree.get(&path)) {
            (_, Some(Node::Dir)) => {
                return Err(io::Error::other(format!("{} is a directory", path)))
            }
            (Access::Read, None) => return Err(not_found(&path)),
            (Access::Read, Some(Node::File(data))) => data.clone(),
            (Access::Append, Some(Node::File(data))) => data.clone(),
            (Access::Write | Access::Append, None) | (Access::Write, Some(Node::File(_))) => {
                tree.ensure_parent_dir(&path)?;
                Vec::new()
            }
        };

        if mode.is_write() {
            tree.nodes.insert(path.clone(), Node::File(content.clone()));
        }

        let mut buffer = Cursor::new(content);
        if mode.access == Access::Append {
            buffer.seek(SeekFrom::End(0))?;
        }

        Ok(Box::new(MemoryStream {
            tree: Arc::clone(&self.tree),
            path,
            buffer,
            access: mode.access,
            dirty: false,
        }))
    }

    fn connect(&mut self) -> io::Result<()> {
        debug!("Memory filesystem connected");
        self.connected = true;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn disconnect(&mut self) -> io::Result<()> {
        debug!("Memory filesystem disconnected");
        self.connected = false;
        Ok(())
    }
}

/// Open handle on a memory file; writes land in the tree on flush or drop
struct MemoryStream {
    tree: Arc<Mutex<Tree>>,
    path: String,
    buffer: Cursor<Vec<u8>>,
    access: Access,
    dirty: bool,
}

impl MemoryStream {
    fn commit(&mut self) -> io::Result<()> {
        if !self.dirty {
            return Ok(());
        }
        let mut tree = lock(&self.tree)?;
        self.dirty = false;
        if !tree.is_dir(&parent(&self.path)) {
            debug!("Discarding write to {}: parent was removed", self.path);
            return Ok(());
        }
        tree.nodes
            .insert(self.path.clone(), Node::File(self.buffer.get_ref().clone()));
        Ok(())
    }
}

impl Read for MemoryStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.access != Access::Read {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "stream not opened for reading",
            ));
        }
        self.buffer.read(buf)
    }
}

impl Write for MemoryStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.access == Access::Read {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "stream not opened for writing",
            ));
        }
        let written = self.buffer.write(buf)?;
        self.dirty = true;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.commit()
    }
}

impl Drop for MemoryStream {
    fn drop(&mut self) {
        if let Err(e) = self.commit() {
            debug!("Dropping unflushed write to {}: {}", self.path, e);
        }
    }
}

fn lock(tree: &Mutex<Tree>) -> io::Result<MutexGuard<'_, Tree>> {
    tree.lock()
        .map_err(|_| io::Error::other("memory filesystem lock poisoned"))
}

fn not_found(path: &str) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("{} not found", path))
}

/// Canonical absolute form: leading `/`, no empty, `.` or `..` components
fn normalize(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            _ => parts.push(part),
        }
    }
    format!("/{}", parts.join("/"))
}

fn parent(path: &str) -> String {
    match path.rfind('/') {
        Some(0) | None => ROOT.to_string(),
        Some(idx) => path[..idx].to_string(),
    }
}

/// Proper ancestors of `path` from the top down, excluding the root
fn ancestors(path: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = parent(path);
    while current != ROOT {
        let next = parent(&current);
        out.push(current);
        current = next;
    }
    out.reverse();
    out
}

fn child_prefix(dir: &str) -> String {
    if dir == ROOT {
        ROOT.to_string()
    } else {
        format!("{}/", dir)
    }
}
