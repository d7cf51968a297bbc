//! Unique hidden sibling names for write-then-rename.
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Hidden temp name inside `dir`.
/// Pattern: `.safe_tree.<pid>.<nanos>.<seq>.tmp`
pub(crate) fn unique_temp_path(dir: &Path) -> PathBuf {
    let pid = std::process::id();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
    dir.join(format!(".safe_tree.{pid}.{nanos}.{seq}.tmp"))
}
