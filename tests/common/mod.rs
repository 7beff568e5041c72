#![allow(dead_code)]

use std::path::Path;

use serde_json::{json, Value};
use templatedir::fs::{DiskFs, MemFs, WriteFs};

pub const VARS_TEMPLATE: &str = "Author is {{ Author }}
This repository is named {{ RepoName }}
Local root of repository is {{ Workspace }}
";

/// The template tree used across the integration tests.
pub fn fixture_files() -> Vec<(&'static str, &'static str)> {
    vec![
        ("dir1/dir2/file3.txt.template", "you pass {{ Count }}."),
        ("dir1/dir3/file4.template", "another {{ Count }}."),
        ("dir1/vars/test.template", VARS_TEMPLATE),
        ("{{ Count }}.template", "answer is {{ Count }}"),
    ]
}

pub fn fixture_fs() -> MemFs {
    MemFs::with_files(fixture_files()).unwrap()
}

/// Writes the fixture tree below `root` on disk.
pub fn write_fixture(root: &Path) -> DiskFs {
    let fs = DiskFs::new(root);
    for (path, content) in fixture_files() {
        if let Some((dir, _)) = path.rsplit_once('/') {
            fs.create_dir_all(dir).unwrap();
        }
        fs.write_file(path, content.as_bytes()).unwrap();
    }
    fs
}

pub fn args() -> Value {
    json!({"Count": 42})
}
