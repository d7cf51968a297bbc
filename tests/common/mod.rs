//! Shared helpers for integration tests: a filesystem wrapper that fails on
//! chosen paths, and a content snapshot of a directory tree.
#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use safe_tree::{FileEntry, Filesystem, StdFs};
use walkdir::WalkDir;

fn injected(what: &str, path: &Path) -> io::Error {
    io::Error::other(format!("injected {what} failure at {}", path.display()))
}

/// `StdFs` with configurable failures.
#[derive(Debug, Default)]
pub struct FaultyFs {
    inner: StdFs,
    remove_faults: HashSet<PathBuf>,
    copy_faults: HashSet<PathBuf>,
    fail_copy_at: Option<usize>,
    copies: AtomicUsize,
}

impl FaultyFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail `remove_file`/`remove_dir` on `path`.
    pub fn fail_remove(mut self, path: impl Into<PathBuf>) -> Self {
        self.remove_faults.insert(path.into());
        self
    }

    /// Fail `copy_file` whose destination is `path`.
    pub fn fail_copy_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.copy_faults.insert(path.into());
        self
    }

    /// Fail the `n`-th `copy_file` call (1-based).
    pub fn fail_nth_copy(mut self, n: usize) -> Self {
        self.fail_copy_at = Some(n);
        self
    }

    fn check_remove(&self, path: &Path) -> io::Result<()> {
        if self.remove_faults.contains(path) {
            return Err(injected("remove", path));
        }
        Ok(())
    }
}

impl Filesystem for FaultyFs {
    fn attributes(&self, path: &Path) -> Option<FileEntry> {
        self.inner.attributes(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        self.inner.read_dir(path)
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        self.inner.create_dir(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.inner.create_dir_all(path)
    }

    fn copy_file(&self, src: &Path, dst: &Path, replace: bool) -> io::Result<u64> {
        let n = self.copies.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_copy_at == Some(n) || self.copy_faults.contains(dst) {
            return Err(injected("copy", dst));
        }
        self.inner.copy_file(src, dst, replace)
    }

    fn copy_symlink(&self, src: &Path, dst: &Path, replace: bool) -> io::Result<()> {
        self.inner.copy_symlink(src, dst, replace)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        self.check_remove(path)?;
        self.inner.remove_file(path)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        self.check_remove(path)?;
        self.inner.remove_dir(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        self.inner.rename(from, to)
    }

    fn copy_attributes(&self, src: &Path, dst: &Path) -> io::Result<()> {
        self.inner.copy_attributes(src, dst)
    }
}

/// Relative path -> file bytes (`None` for directories), root excluded.
pub type Snapshot = BTreeMap<PathBuf, Option<Vec<u8>>>;

pub fn snapshot(root: &Path) -> Snapshot {
    WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .map(|e| e.expect("walk"))
        .map(|e| {
            let rel = e.path().strip_prefix(root).expect("under root").to_path_buf();
            let body = if e.file_type().is_dir() {
                None
            } else {
                Some(fs::read(e.path()).expect("read file"))
            };
            (rel, body)
        })
        .collect()
}

/// Names directly inside `dir`, sorted.
pub fn names_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("read_dir")
        .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
