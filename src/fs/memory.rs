//! In-memory filesystem.

use std::collections::BTreeMap;
use std::io::{self, Cursor, Read, Write};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{join, parent, segments, DirEntry, Metadata, ReadFs, WriteFs};

#[derive(Debug)]
enum Node {
    File(Vec<u8>),
    Dir(BTreeMap<String, Node>),
}

impl Default for Node {
    fn default() -> Self {
        Node::Dir(BTreeMap::new())
    }
}

/// A filesystem held entirely in memory.
///
/// Clones share the same tree, so a clone handed to the engine as the
/// destination can be inspected afterwards through the original handle.
/// Views returned by [`WriteFs::sub`] share it too.
#[derive(Debug, Clone, Default)]
pub struct MemFs {
    tree: Arc<RwLock<Node>>,
    prefix: Vec<String>,
}

fn not_found(path: &str) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("'{path}' does not exist"))
}

fn not_a_dir(path: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, format!("'{path}' is not a directory"))
}

fn poisoned() -> io::Error {
    io::Error::other("memory filesystem lock poisoned")
}

impl MemFs {
    /// Creates an empty filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a filesystem holding the given files, with their ancestors.
    pub fn with_files<I, P, C>(files: I) -> io::Result<Self>
    where
        I: IntoIterator<Item = (P, C)>,
        P: AsRef<str>,
        C: AsRef<[u8]>,
    {
        let fs = Self::new();
        for (path, content) in files {
            let path = path.as_ref();
            if let Some(dir) = parent(path) {
                fs.create_dir_all(dir)?;
            }
            fs.write_file(path, content.as_ref())?;
        }
        Ok(fs)
    }

    fn read(&self) -> io::Result<RwLockReadGuard<'_, Node>> {
        self.tree.read().map_err(|_| poisoned())
    }

    fn write(&self) -> io::Result<RwLockWriteGuard<'_, Node>> {
        self.tree.write().map_err(|_| poisoned())
    }

    fn full_path<'a>(&'a self, path: &'a str) -> io::Result<Vec<&'a str>> {
        let mut full: Vec<&str> = self.prefix.iter().map(String::as_str).collect();
        full.extend(segments(path)?);
        Ok(full)
    }

    /// Runs `f` on the directory holding the final segment of `path`.
    fn with_parent<T>(
        &self,
        path: &str,
        f: impl FnOnce(&mut BTreeMap<String, Node>, &str) -> io::Result<T>,
    ) -> io::Result<T> {
        let full = self.full_path(path)?;
        let Some((&name, ancestors)) = full.split_last() else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "the root cannot be replaced",
            ));
        };
        let mut root = self.write()?;
        let mut node = &mut *root;
        for segment in ancestors {
            node = match node {
                Node::Dir(children) => children.get_mut(*segment).ok_or_else(|| not_found(path))?,
                Node::File(_) => return Err(not_a_dir(path)),
            };
        }
        match node {
            Node::Dir(children) => f(children, name),
            Node::File(_) => Err(not_a_dir(path)),
        }
    }

    fn append(&self, path: &str, data: &[u8]) -> io::Result<()> {
        self.with_parent(path, |children, name| match children.get_mut(name) {
            Some(Node::File(content)) => {
                content.extend_from_slice(data);
                Ok(())
            }
            Some(Node::Dir(_)) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{path}' is a directory"),
            )),
            None => Err(not_found(path)),
        })
    }
}

fn lookup<'a>(root: &'a Node, full: &[&str]) -> Option<&'a Node> {
    full.iter().try_fold(root, |node, segment| match node {
        Node::Dir(children) => children.get(*segment),
        Node::File(_) => None,
    })
}

impl ReadFs for MemFs {
    fn stat(&self, path: &str) -> io::Result<Metadata> {
        let full = self.full_path(path)?;
        let root = self.read()?;
        match lookup(&root, &full) {
            Some(Node::File(content)) => Ok(Metadata { is_dir: false, len: content.len() as u64 }),
            Some(Node::Dir(_)) => Ok(Metadata { is_dir: true, len: 0 }),
            None => Err(not_found(path)),
        }
    }

    fn open(&self, path: &str) -> io::Result<Box<dyn Read + Send + '_>> {
        Ok(Box::new(Cursor::new(self.read_file(path)?)))
    }

    fn read_dir(&self, path: &str) -> io::Result<Vec<DirEntry>> {
        let full = self.full_path(path)?;
        let root = self.read()?;
        match lookup(&root, &full) {
            Some(Node::Dir(children)) => Ok(children
                .iter()
                .map(|(name, node)| DirEntry {
                    name: name.clone(),
                    is_dir: matches!(node, Node::Dir(_)),
                })
                .collect()),
            Some(Node::File(_)) => Err(not_a_dir(path)),
            None => Err(not_found(path)),
        }
    }

    fn read_file(&self, path: &str) -> io::Result<Vec<u8>> {
        let full = self.full_path(path)?;
        let root = self.read()?;
        match lookup(&root, &full) {
            Some(Node::File(content)) => Ok(content.clone()),
            Some(Node::Dir(_)) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{path}' is a directory"),
            )),
            None => Err(not_found(path)),
        }
    }
}

struct MemFile<'a> {
    fs: &'a MemFs,
    path: String,
}

impl Write for MemFile<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.fs.append(&self.path, buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl WriteFs for MemFs {
    fn create_dir(&self, path: &str) -> io::Result<()> {
        if segments(path)?.is_empty() {
            return Ok(());
        }
        self.with_parent(path, |children, name| match children.get(name) {
            Some(Node::Dir(_)) => Ok(()),
            Some(Node::File(_)) => Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("'{path}' exists and is a file"),
            )),
            None => {
                children.insert(name.to_string(), Node::default());
                Ok(())
            }
        })
    }

    fn create_file(&self, path: &str) -> io::Result<Box<dyn Write + Send + '_>> {
        self.with_parent(path, |children, name| match children.get(name) {
            Some(Node::Dir(_)) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{path}' is a directory"),
            )),
            _ => {
                children.insert(name.to_string(), Node::File(Vec::new()));
                Ok(())
            }
        })?;
        Ok(Box::new(MemFile { fs: self, path: path.to_string() }))
    }

    fn remove(&self, path: &str) -> io::Result<()> {
        self.with_parent(path, |children, name| match children.get(name) {
            Some(Node::Dir(grandchildren)) if !grandchildren.is_empty() => Err(io::Error::other(
                format!("directory '{path}' is not empty"),
            )),
            Some(_) => {
                children.remove(name);
                Ok(())
            }
            None => Err(not_found(path)),
        })
    }

    fn write_file(&self, path: &str, data: &[u8]) -> io::Result<()> {
        self.with_parent(path, |children, name| match children.get(name) {
            Some(Node::Dir(_)) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{path}' is a directory"),
            )),
            _ => {
                children.insert(name.to_string(), Node::File(data.to_vec()));
                Ok(())
            }
        })
    }

    fn sub(&self, dir: &str) -> io::Result<Self> {
        if !self.stat(dir)?.is_dir {
            return Err(not_a_dir(dir));
        }
        let mut prefix = self.prefix.clone();
        prefix.extend(segments(dir)?.into_iter().map(str::to_string));
        Ok(Self { tree: Arc::clone(&self.tree), prefix })
    }
}

impl MemFs {
    /// Returns the relative paths of every file in the tree, in walk order.
    pub fn files(&self) -> io::Result<Vec<String>> {
        fn visit(fs: &MemFs, dir: &str, out: &mut Vec<String>) -> io::Result<()> {
            for entry in fs.read_dir(dir)? {
                let path = join(dir, &entry.name);
                if entry.is_dir {
                    visit(fs, &path, out)?;
                } else {
                    out.push(path);
                }
            }
            Ok(())
        }
        let mut out = Vec::new();
        visit(self, "", &mut out)?;
        Ok(out)
    }
}
