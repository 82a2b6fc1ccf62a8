//! Shared test utilities for the pollsite test suite.
//!
//! Tree builders and timestamp helpers for staleness scenarios.
//!
//! # Timestamps
//!
//! Staleness compares the later of `ctime` and `mtime`. Writing a file always
//! sets `ctime` to "now", so a test cannot move a file into the past. Instead
//! [`bump`] pushes a file's `mtime` into the future, which orders files
//! deterministically without sleeping:
//!
//! ```text
//! let dst = write_file(tmp.path(), "dst/page.html", "old");
//! bump(&dst, 10);      // destination is "10s from now"
//! bump(&layout, 20);   // layout is newer than the destination
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

// =========================================================================
// Fixture setup
// =========================================================================

/// Write `content` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// Write every `(relative path, content)` pair under `root`.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    fs::create_dir_all(root).unwrap();
    for (relative, content) in files {
        write_file(root, relative, content);
    }
}

/// Set a file's modification time to `secs` seconds from now.
pub fn bump(path: &Path, secs: u64) {
    let file = fs::OpenOptions::new().write(true).open(path).unwrap();
    file.set_modified(SystemTime::now() + Duration::from_secs(secs))
        .unwrap();
}

// =========================================================================
// Tree inspection
// =========================================================================

/// Sorted `/`-separated relative paths of every file under `root`.
pub fn file_set(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(root)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap()
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .collect();
    files.sort();
    files
}
