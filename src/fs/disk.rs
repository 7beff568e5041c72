//! Real filesystem, rooted at a directory.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{compile_glob, segments, DirEntry, Metadata, ReadFs, WriteFs};

/// A directory of the real filesystem. Every path is resolved below `root`.
#[derive(Debug, Clone)]
pub struct DiskFs {
    root: PathBuf,
}

impl DiskFs {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> io::Result<PathBuf> {
        let mut resolved = self.root.clone();
        resolved.extend(segments(path)?);
        Ok(resolved)
    }
}

fn relative_name(path: &Path) -> io::Result<String> {
    let parts = path
        .components()
        .map(|c| {
            c.as_os_str().to_str().map(str::to_string).ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("'{}' is not valid UTF-8", path.display()),
                )
            })
        })
        .collect::<io::Result<Vec<_>>>()?;
    Ok(parts.join("/"))
}

/// Removes `path` if it is a symlink, so that a write replaces the link
/// instead of going through it.
fn unlink_symlink(path: &Path) -> io::Result<()> {
    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.file_type().is_symlink() => fs::remove_file(path),
        _ => Ok(()),
    }
}

impl ReadFs for DiskFs {
    fn stat(&self, path: &str) -> io::Result<Metadata> {
        let metadata = fs::metadata(self.resolve(path)?)?;
        Ok(Metadata { is_dir: metadata.is_dir(), len: metadata.len() })
    }

    fn open(&self, path: &str) -> io::Result<Box<dyn Read + Send + '_>> {
        Ok(Box::new(File::open(self.resolve(path)?)?))
    }

    fn read_dir(&self, path: &str) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(self.resolve(path)?)? {
            let entry = entry?;
            let name = entry.file_name().into_string().map_err(|name| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("'{}' is not valid UTF-8", name.to_string_lossy()),
                )
            })?;
            // Symlinks are entries of their own, never directories to descend into.
            let is_dir = entry.file_type()?.is_dir();
            entries.push(DirEntry { name, is_dir });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn read_file(&self, path: &str) -> io::Result<Vec<u8>> {
        fs::read(self.resolve(path)?)
    }

    fn glob(&self, pattern: &str) -> io::Result<Vec<String>> {
        let matcher = compile_glob(pattern)?;
        let mut found = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(io::Error::from)?;
            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            let relative = relative_name(relative)?;
            if matcher.is_match(&relative) {
                found.push(relative);
            }
        }
        Ok(found)
    }
}

impl WriteFs for DiskFs {
    fn create_dir(&self, path: &str) -> io::Result<()> {
        let resolved = self.resolve(path)?;
        match fs::create_dir(&resolved) {
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && resolved.is_dir() => Ok(()),
            result => result,
        }
    }

    fn create_file(&self, path: &str) -> io::Result<Box<dyn Write + Send + '_>> {
        let resolved = self.resolve(path)?;
        unlink_symlink(&resolved)?;
        Ok(Box::new(File::create(resolved)?))
    }

    fn remove(&self, path: &str) -> io::Result<()> {
        let resolved = self.resolve(path)?;
        if fs::symlink_metadata(&resolved)?.is_dir() {
            fs::remove_dir(resolved)
        } else {
            fs::remove_file(resolved)
        }
    }

    fn write_file(&self, path: &str, data: &[u8]) -> io::Result<()> {
        let resolved = self.resolve(path)?;
        unlink_symlink(&resolved)?;
        fs::write(resolved, data)
    }

    fn create_dir_all(&self, path: &str) -> io::Result<()> {
        fs::create_dir_all(self.resolve(path)?)
    }

    fn sub(&self, dir: &str) -> io::Result<Self> {
        Ok(Self::new(self.resolve(dir)?))
    }
}
