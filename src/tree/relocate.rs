//! Move (copy then delete, compensated) and in-place rename.

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::backend::Filesystem;
use super::backup::BackupNames;
use super::copy::copy_subtree_logged;
use super::delete::{delete_subtree_safe, discard_copy, remove_tree, restore_removed};
use super::journal::CommitLog;
use super::options::CopyOptions;
use crate::errors::{Result, TreeError};

/// Relocate `src` into `dest_dir`. Returns the new path.
///
/// If the source cannot be removed after copying, whatever was already
/// removed is put back and the fresh copy is removed again. Without safe mode
/// the copy itself is the restore source; safe mode takes a separate backup.
pub(super) fn move_subtree<F, N>(fs: &F, names: &N, src: &Path, dest_dir: &Path, safe_mode: bool) -> Result<PathBuf>
where
    F: Filesystem + ?Sized,
    N: BackupNames + ?Sized,
{
    let entry = fs.attributes(src).ok_or_else(|| TreeError::NotFound {
        op: "move",
        path: src.to_path_buf(),
    })?;
    let name = entry
        .path()
        .file_name()
        .ok_or_else(|| TreeError::InvalidArgument(format!("'{}' has no file name", entry.path().display())))?;
    let target = dest_dir.join(name);
    if fs.exists(&target) {
        return Err(TreeError::AlreadyExists {
            op: "move",
            path: target,
        });
    }

    let copied = copy_subtree_logged(fs, entry.path(), dest_dir, None, CopyOptions::default())?;

    let removal = if safe_mode {
        delete_subtree_safe(fs, names, entry.path()).map(drop)
    } else {
        remove_source_from_copy(fs, entry.path(), &target)
    };
    if let Err(e) = removal {
        warn!(src = %entry.path().display(), target = %target.display(), error = %e, "source removal failed; discarding copy");
        discard_copy(fs, copied);
        return Err(e);
    }

    info!(src = %entry.path().display(), target = %target.display(), safe_mode, "moved");
    Ok(target)
}

/// Plain removal of a moved source. On failure the removed entries are
/// restored from `copy`, the already verified copy of `src`.
fn remove_source_from_copy<F>(fs: &F, src: &Path, copy: &Path) -> Result<()>
where
    F: Filesystem + ?Sized,
{
    let mut removed = CommitLog::new();
    match remove_tree(fs, src, &mut removed) {
        Ok(()) => Ok(()),
        Err(e) => {
            let failed = restore_removed(fs, src, copy, removed);
            if failed > 0 {
                warn!(src = %src.display(), failed, "source restore incomplete");
            }
            Err(e)
        }
    }
}

/// Rename `path` to `new_name` within the same parent directory.
pub(super) fn rename<F>(fs: &F, path: &Path, new_name: &str) -> Result<PathBuf>
where
    F: Filesystem + ?Sized,
{
    validate_name(new_name)?;
    let entry = fs.attributes(path).ok_or_else(|| TreeError::NotFound {
        op: "rename",
        path: path.to_path_buf(),
    })?;
    let parent = entry.parent().ok_or_else(|| {
        TreeError::InvalidArgument(format!("'{}' has no parent directory", entry.path().display()))
    })?;
    let target = parent.join(new_name);
    if fs.exists(&target) {
        return Err(TreeError::AlreadyExists {
            op: "rename",
            path: target,
        });
    }
    fs.rename(entry.path(), &target)
        .map_err(TreeError::io("rename", entry.path()))?;
    info!(from = %entry.path().display(), to = %target.display(), "renamed");
    Ok(target)
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." || name.chars().any(std::path::is_separator) {
        return Err(TreeError::InvalidArgument(format!(
            "'{name}' is not a plain file name"
        )));
    }
    Ok(())
}
