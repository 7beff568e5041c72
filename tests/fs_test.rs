use std::io::{self, Read};

use tempfile::TempDir;
use templatedir::fs::{DirEntry, DiskFs, MemFs, Op, ReadFs, RecordingFs, WriteFs};

/// Runs the same sequence against any backend.
fn exercise<F: WriteFs>(fs: &F) {
    fs.create_dir_all("dir1/dir2").unwrap();
    fs.write_file("dir1/dir2/file3.txt", b"you pass 42.").unwrap();
    fs.write_file("top", b"").unwrap();

    assert!(fs.stat("dir1").unwrap().is_dir);
    assert_eq!(fs.stat("dir1/dir2/file3.txt").unwrap().len, 12);
    assert_eq!(
        fs.read_dir("").unwrap(),
        vec![
            DirEntry { name: "dir1".to_string(), is_dir: true },
            DirEntry { name: "top".to_string(), is_dir: false },
        ]
    );

    let mut content = String::new();
    fs.open("dir1/dir2/file3.txt").unwrap().read_to_string(&mut content).unwrap();
    assert_eq!(content, "you pass 42.");

    assert_eq!(fs.glob("dir1/*/*.txt").unwrap(), vec!["dir1/dir2/file3.txt"]);

    let sub = fs.sub("dir1").unwrap();
    assert_eq!(sub.read_file("dir2/file3.txt").unwrap(), b"you pass 42.");

    fs.remove("top").unwrap();
    assert_eq!(fs.stat("top").unwrap_err().kind(), io::ErrorKind::NotFound);
}

#[test]
fn test_memory_backend() {
    exercise(&MemFs::new());
}

#[test]
fn test_disk_backend() {
    let temp_dir = TempDir::new().unwrap();
    exercise(&DiskFs::new(temp_dir.path()));
}

#[test]
fn test_recording_backend() {
    let fs = RecordingFs::new(MemFs::new());
    exercise(&fs);

    let ops = fs.ops();
    assert_eq!(ops.first(), Some(&Op::CreateDir("dir1".to_string())));
    assert_eq!(ops.last(), Some(&Op::Stat("top".to_string())));
    assert!(ops.contains(&Op::Sub("dir1".to_string())));
    assert!(ops.contains(&Op::Glob("dir1/*/*.txt".to_string())));
}
