//! Filesystem wrapper recording every call made through it.

use std::io::{self, Read, Write};
use std::sync::{Arc, Mutex};

use super::{DirEntry, Metadata, ReadFs, WriteFs};

/// A single recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Stat(String),
    Open(String),
    ReadDir(String),
    ReadFile(String),
    Glob(String),
    CreateDir(String),
    CreateFile(String),
    Remove(String),
    WriteFile(String),
    Sub(String),
}

/// Delegates to an inner capability and records each call, in call order.
/// Clones share the same log.
#[derive(Debug, Clone)]
pub struct RecordingFs<F> {
    inner: F,
    log: Arc<Mutex<Vec<Op>>>,
}

impl<F> RecordingFs<F> {
    pub fn new(inner: F) -> Self {
        Self { inner, log: Arc::default() }
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }

    /// Returns the calls recorded so far.
    pub fn ops(&self) -> Vec<Op> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    /// Returns the position of the first recorded call equal to `op`.
    pub fn position(&self, op: &Op) -> Option<usize> {
        self.ops().iter().position(|recorded| recorded == op)
    }

    fn record(&self, op: Op) {
        if let Ok(mut log) = self.log.lock() {
            log.push(op);
        }
    }
}

impl<F: ReadFs> ReadFs for RecordingFs<F> {
    fn stat(&self, path: &str) -> io::Result<Metadata> {
        self.record(Op::Stat(path.to_string()));
        self.inner.stat(path)
    }

    fn open(&self, path: &str) -> io::Result<Box<dyn Read + Send + '_>> {
        self.record(Op::Open(path.to_string()));
        self.inner.open(path)
    }

    fn read_dir(&self, path: &str) -> io::Result<Vec<DirEntry>> {
        self.record(Op::ReadDir(path.to_string()));
        self.inner.read_dir(path)
    }

    fn read_file(&self, path: &str) -> io::Result<Vec<u8>> {
        self.record(Op::ReadFile(path.to_string()));
        self.inner.read_file(path)
    }

    fn glob(&self, pattern: &str) -> io::Result<Vec<String>> {
        self.record(Op::Glob(pattern.to_string()));
        self.inner.glob(pattern)
    }
}

impl<F: WriteFs> WriteFs for RecordingFs<F> {
    fn create_dir(&self, path: &str) -> io::Result<()> {
        self.record(Op::CreateDir(path.to_string()));
        self.inner.create_dir(path)
    }

    fn create_file(&self, path: &str) -> io::Result<Box<dyn Write + Send + '_>> {
        self.record(Op::CreateFile(path.to_string()));
        self.inner.create_file(path)
    }

    fn remove(&self, path: &str) -> io::Result<()> {
        self.record(Op::Remove(path.to_string()));
        self.inner.remove(path)
    }

    fn write_file(&self, path: &str, data: &[u8]) -> io::Result<()> {
        self.record(Op::WriteFile(path.to_string()));
        self.inner.write_file(path, data)
    }

    fn sub(&self, dir: &str) -> io::Result<Self> {
        self.record(Op::Sub(dir.to_string()));
        Ok(Self { inner: self.inner.sub(dir)?, log: Arc::clone(&self.log) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemFs;

    #[test]
    fn test_records_in_call_order() {
        let fs = RecordingFs::new(MemFs::new());
        fs.create_dir_all("dir1/dir2").unwrap();
        fs.write_file("dir1/dir2/file", b"x").unwrap();
        fs.read_file("dir1/dir2/file").unwrap();
        assert!(fs.remove("missing").is_err());

        assert_eq!(
            fs.ops(),
            vec![
                Op::CreateDir("dir1".to_string()),
                Op::CreateDir("dir1/dir2".to_string()),
                Op::WriteFile("dir1/dir2/file".to_string()),
                Op::ReadFile("dir1/dir2/file".to_string()),
                Op::Remove("missing".to_string()),
            ]
        );
        assert_eq!(fs.inner().read_file("dir1/dir2/file").unwrap(), b"x");
    }
}
