//! Backup naming for safe-mode operations.
//!
//! Backups live next to the thing they protect (same parent, so the copy
//! stays on one filesystem). Names come from an injectable [`BackupNames`]
//! generator and are checked against the directory before use.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use super::backend::Filesystem;
use crate::errors::{Result, TreeError};

/// Maximum number of generated names tried before giving up.
const MAX_ATTEMPTS: usize = 16;

/// Source of backup names.
pub trait BackupNames {
    fn next_name(&self) -> String;
}

/// Random names: `bak` followed by a v4 UUID in simple form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidNames;

impl BackupNames for UuidNames {
    fn next_name(&self) -> String {
        format!("bak{}", uuid::Uuid::new_v4().simple())
    }
}

/// Deterministic names `<prefix>0`, `<prefix>1`, ...
#[derive(Debug)]
pub struct SequentialNames {
    prefix: String,
    next: AtomicU64,
}

impl SequentialNames {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(0),
        }
    }
}

impl Default for SequentialNames {
    fn default() -> Self {
        Self::new(".bak")
    }
}

impl BackupNames for SequentialNames {
    fn next_name(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}{}", self.prefix, n)
    }
}

/// Where a safe-mode backup of `original` was placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupRecord {
    pub original: PathBuf,
    pub backup: PathBuf,
}

/// Pick an unused sibling path inside `dir`.
pub(super) fn allocate_sibling<F, N>(fs: &F, names: &N, dir: &Path) -> Result<PathBuf>
where
    F: Filesystem + ?Sized,
    N: BackupNames + ?Sized,
{
    for _ in 0..MAX_ATTEMPTS {
        let candidate = dir.join(names.next_name());
        if !fs.exists(&candidate) {
            return Ok(candidate);
        }
        tracing::debug!(path = %candidate.display(), "backup name taken; retrying");
    }
    Err(TreeError::AlreadyExists {
        op: "allocate backup name",
        path: dir.to_path_buf(),
    })
}
