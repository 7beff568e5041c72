//! Filesystem capabilities the rendering engine is written against.
//!
//! The engine never touches a concrete disk API: it reads the template tree
//! through [`ReadFs`] and writes the output tree through [`WriteFs`]. Paths
//! handed to these traits are relative and slash-separated; `""` and `"."`
//! designate the root of the capability.
//!
//! Three implementations are provided:
//! - [`DiskFs`]: a directory of the real filesystem
//! - [`MemFs`]: an in-memory tree, shared between clones
//! - [`RecordingFs`]: wraps another capability and records every call

use globset::{GlobBuilder, GlobMatcher};
use std::io::{self, Read, Write};

pub mod disk;
pub mod memory;
pub mod recording;

pub use disk::DiskFs;
pub use memory::MemFs;
pub use recording::{Op, RecordingFs};

/// Metadata of a single entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metadata {
    pub is_dir: bool,
    pub len: u64,
}

/// One child of a directory, as returned by [`ReadFs::read_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

/// Read side of a filesystem capability.
pub trait ReadFs: Send + Sync {
    /// Returns the metadata of the entry at `path`.
    fn stat(&self, path: &str) -> io::Result<Metadata>;

    /// Opens the file at `path` for reading.
    fn open(&self, path: &str) -> io::Result<Box<dyn Read + Send + '_>>;

    /// Lists the immediate children of the directory at `path`, sorted by name.
    fn read_dir(&self, path: &str) -> io::Result<Vec<DirEntry>>;

    /// Reads the whole file at `path` into memory.
    fn read_file(&self, path: &str) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.open(path)?.read_to_end(&mut buf)?;
        Ok(buf)
    }

    /// Returns the relative paths of every entry matching `pattern`, in walk
    /// order. `*` does not cross `/`; use `**` for that.
    fn glob(&self, pattern: &str) -> io::Result<Vec<String>> {
        let matcher = compile_glob(pattern)?;
        let mut found = Vec::new();
        collect_matches(self, "", &matcher, &mut found)?;
        Ok(found)
    }
}

/// Write side of a filesystem capability.
pub trait WriteFs: ReadFs {
    /// Creates the directory at `path`. Succeeds if it already exists.
    fn create_dir(&self, path: &str) -> io::Result<()>;

    /// Creates or truncates the file at `path` and opens it for writing.
    /// The parent directory must exist.
    fn create_file(&self, path: &str) -> io::Result<Box<dyn Write + Send + '_>>;

    /// Removes the file or empty directory at `path`.
    fn remove(&self, path: &str) -> io::Result<()>;

    /// Replaces the content of the file at `path` with `data`.
    fn write_file(&self, path: &str, data: &[u8]) -> io::Result<()> {
        let mut file = self.create_file(path)?;
        file.write_all(data)?;
        file.flush()
    }

    /// Creates the directory at `path` along with all its missing ancestors.
    fn create_dir_all(&self, path: &str) -> io::Result<()> {
        let mut current = String::new();
        for segment in segments(path)? {
            current = join(&current, segment);
            self.create_dir(&current)?;
        }
        Ok(())
    }

    /// Returns a view of the sub-tree rooted at `dir`, sharing the same storage.
    fn sub(&self, dir: &str) -> io::Result<Self>
    where
        Self: Sized;
}

/// Splits a relative path into its segments, dropping empty and `.` ones.
///
/// # Errors
/// * `InvalidInput` if the path is absolute or contains `..`
pub fn segments(path: &str) -> io::Result<Vec<&str>> {
    if path.starts_with('/') {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("absolute path '{path}' is not allowed"),
        ));
    }
    let mut result = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("path '{path}' escapes its root"),
                ))
            }
            _ => result.push(segment),
        }
    }
    Ok(result)
}

/// Joins a relative directory and a name with a single `/`.
pub fn join(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

/// Returns the parent directory of a relative path, `None` for top-level entries.
pub fn parent(path: &str) -> Option<&str> {
    path.rsplit_once('/').map(|(dir, _)| dir).filter(|dir| !dir.is_empty())
}

pub(crate) fn compile_glob(pattern: &str) -> io::Result<GlobMatcher> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))
}

fn collect_matches<F: ReadFs + ?Sized>(
    fs: &F,
    dir: &str,
    matcher: &GlobMatcher,
    found: &mut Vec<String>,
) -> io::Result<()> {
    for entry in fs.read_dir(dir)? {
        let path = join(dir, &entry.name);
        if matcher.is_match(&path) {
            found.push(path.clone());
        }
        if entry.is_dir {
            collect_matches(fs, &path, matcher, found)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments() {
        assert_eq!(segments("").unwrap(), Vec::<&str>::new());
        assert_eq!(segments(".").unwrap(), Vec::<&str>::new());
        assert_eq!(segments("a/./b//c").unwrap(), vec!["a", "b", "c"]);
        assert!(segments("/etc").is_err());
        assert!(segments("a/../b").is_err());
    }

    #[test]
    fn test_join_and_parent() {
        assert_eq!(join("", "file"), "file");
        assert_eq!(join("dir1/dir2", "file"), "dir1/dir2/file");
        assert_eq!(parent("dir1/dir2/file"), Some("dir1/dir2"));
        assert_eq!(parent("file"), None);
    }

    #[test]
    fn test_default_glob() {
        let fs = MemFs::with_files([
            ("dir1/a.template", "a"),
            ("dir1/b.txt", "b"),
            ("dir1/dir2/c.template", "c"),
            ("d.template", "d"),
        ])
        .unwrap();

        assert_eq!(fs.glob("*.template").unwrap(), vec!["d.template"]);
        assert_eq!(
            fs.glob("**/*.template").unwrap(),
            vec!["d.template", "dir1/a.template", "dir1/dir2/c.template"]
        );
        assert!(fs.glob("[").is_err());
    }
}
