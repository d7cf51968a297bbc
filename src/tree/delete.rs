//! Recursive subtree delete, optionally guarded by a sibling backup.
//!
//! Deletion is post-order and fail-fast: the first child that cannot be
//! removed aborts the walk and siblings already removed stay removed. In safe
//! mode those removals are then replayed from the backup, newest first, and
//! the backup is dropped whatever the outcome.

use std::path::Path;
use tracing::{debug, info, trace, warn};

use super::backend::Filesystem;
use super::backup::{BackupNames, BackupRecord, allocate_sibling};
use super::copy::{copy_subtree_logged, discard_created};
use super::journal::{Action, CommitLog};
use super::options::{ConflictPolicy, CopyOptions};
use crate::errors::{Result, TreeError};

/// Delete `path` and everything under it. Each removed node is appended to
/// `log` (snapshot taken before removal) once its absence is verified.
pub(super) fn remove_tree<F>(fs: &F, path: &Path, log: &mut CommitLog) -> Result<()>
where
    F: Filesystem + ?Sized,
{
    let entry = fs.attributes(path).ok_or_else(|| TreeError::NotFound {
        op: "delete",
        path: path.to_path_buf(),
    })?;

    if entry.is_dir() {
        let children = fs
            .read_dir(entry.path())
            .map_err(TreeError::io("read directory", entry.path()))?;
        for child in children {
            remove_tree(fs, &child, log)?;
        }
        fs.remove_dir(entry.path())
            .map_err(TreeError::io("remove directory", entry.path()))?;
    } else {
        fs.remove_file(entry.path())
            .map_err(TreeError::io("remove file", entry.path()))?;
    }

    if fs.exists(entry.path()) {
        return Err(TreeError::from_io(
            "verify removal",
            entry.path(),
            std::io::Error::other("still present after removal"),
        ));
    }
    trace!(path = %entry.path().display(), "removed");
    log.record(Action::Removed(entry));
    Ok(())
}

/// Delete a subtree without any backup.
pub(super) fn delete_subtree_plain<F>(fs: &F, path: &Path) -> Result<CommitLog>
where
    F: Filesystem + ?Sized,
{
    let mut log = CommitLog::new();
    match remove_tree(fs, path, &mut log) {
        Ok(()) => {
            info!(path = %path.display(), removed = log.len(), "deleted subtree");
            Ok(log)
        }
        Err(e) => {
            debug!(path = %path.display(), removed = log.len(), error = %e, "delete aborted");
            Err(e)
        }
    }
}

/// Delete a subtree; on failure put back everything that was removed.
pub(super) fn delete_subtree_safe<F, N>(fs: &F, names: &N, path: &Path) -> Result<CommitLog>
where
    F: Filesystem + ?Sized,
    N: BackupNames + ?Sized,
{
    let root = fs.attributes(path).ok_or_else(|| TreeError::NotFound {
        op: "delete",
        path: path.to_path_buf(),
    })?;
    let parent = root.parent().ok_or_else(|| {
        TreeError::InvalidArgument(format!("refusing to delete '{}': no parent directory", root.path().display()))
    })?;

    let record = BackupRecord {
        original: root.path().to_path_buf(),
        backup: allocate_sibling(fs, names, parent)?,
    };
    fs.create_dir(&record.backup)
        .map_err(TreeError::io("create backup directory", &record.backup))?;
    debug!(path = %record.original.display(), backup = %record.backup.display(), "backing up before delete");

    if let Err(e) = copy_subtree_logged(
        fs,
        &record.original,
        &record.backup,
        None,
        CopyOptions::new(true, ConflictPolicy::Replace),
    ) {
        drop_backup(fs, &record.backup);
        return Err(e);
    }

    let mut log = CommitLog::new();
    let outcome = remove_tree(fs, &record.original, &mut log);
    let result = match outcome {
        Ok(()) => {
            info!(path = %record.original.display(), removed = log.len(), "deleted subtree (safe mode)");
            Ok(log)
        }
        Err(e) => {
            warn!(path = %record.original.display(), error = %e, removed = log.len(), "delete failed; restoring from backup");
            let mirror = record.backup.join(root.path().file_name().unwrap_or_default());
            let failed = restore_removed(fs, &record.original, &mirror, log);
            if failed > 0 {
                warn!(path = %record.original.display(), failed, "restore incomplete");
            }
            Err(e)
        }
    };

    drop_backup(fs, &record.backup);
    result
}

/// Undo removals under `original` in reverse: directories are recreated,
/// everything else is copied back from the same relative path under
/// `mirror`. Returns the number of failed steps.
pub(super) fn restore_removed<F>(fs: &F, original: &Path, mirror: &Path, log: CommitLog) -> usize
where
    F: Filesystem + ?Sized,
{
    log.unwind(|action| {
        let Action::Removed(entry) = action else {
            return Ok(());
        };
        if entry.is_dir() {
            return fs
                .create_dir_all(entry.path())
                .map_err(TreeError::io("recreate directory", entry.path()));
        }
        let relative = entry.path().strip_prefix(original).map_err(|_| {
            TreeError::InvalidArgument(format!("'{}' is outside '{}'", entry.path().display(), original.display()))
        })?;
        let saved = mirror.join(relative);
        let target_dir = entry.parent().ok_or_else(|| {
            TreeError::InvalidArgument(format!("'{}' has no parent directory", entry.path().display()))
        })?;
        let opts = CopyOptions::new(true, ConflictPolicy::Skip);
        copy_subtree_logged(fs, &saved, target_dir, entry.path().file_name(), opts).map(drop)
    })
}

fn drop_backup<F>(fs: &F, backup: &Path)
where
    F: Filesystem + ?Sized,
{
    if let Err(e) = remove_tree(fs, backup, &mut CommitLog::new()) {
        warn!(backup = %backup.display(), error = %e, "failed to remove backup");
    }
}

/// Remove a copy that a caller no longer wants, logging instead of failing.
pub(super) fn discard_copy<F>(fs: &F, log: CommitLog)
where
    F: Filesystem + ?Sized,
{
    let failed = discard_created(fs, log);
    if failed > 0 {
        warn!(failed, "could not remove every copied path");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::backend::StdFs;
    use crate::tree::backup::SequentialNames;
    use assert_fs::prelude::*;

    #[test]
    fn post_order_log() {
        let dir = assert_fs::TempDir::new().unwrap();
        dir.child("t/a.txt").write_str("a").unwrap();
        dir.child("t/sub/b.txt").write_str("b").unwrap();

        let log = delete_subtree_plain(&StdFs::new(), &dir.path().join("t")).unwrap();
        let names: Vec<_> = log
            .actions()
            .iter()
            .map(|a| a.path().file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt", "sub", "t"]);
        assert!(!dir.path().join("t").exists());
    }

    #[test]
    fn safe_delete_succeeds_and_leaves_no_backup() {
        let dir = assert_fs::TempDir::new().unwrap();
        dir.child("t/a.txt").write_str("0123456789").unwrap();
        dir.child("t/sub").create_dir_all().unwrap();

        delete_subtree_safe(&StdFs::new(), &SequentialNames::new("bk"), &dir.path().join("t")).unwrap();
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn safe_delete_of_single_file() {
        let dir = assert_fs::TempDir::new().unwrap();
        dir.child("one.txt").write_str("1").unwrap();
        let log = delete_subtree_safe(&StdFs::new(), &SequentialNames::new("bk"), &dir.path().join("one.txt")).unwrap();
        assert_eq!(log.len(), 1);
        assert!(!dir.path().join("bk0").exists());
    }

    #[test]
    fn missing_path_is_not_found() {
        let dir = assert_fs::TempDir::new().unwrap();
        let err = delete_subtree_plain(&StdFs::new(), &dir.path().join("none")).unwrap_err();
        assert_eq!(err.kind(), crate::errors::ErrorKind::NotFound);
    }
}
