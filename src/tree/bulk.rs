//! Delete a flat set of plain files.
//!
//! In safe mode each file gets its own backup copy next to it, so any
//! processed file can be put back on failure independently of the others.

use std::path::Path;
use tracing::{debug, info, trace, warn};

use super::backend::Filesystem;
use super::backup::{BackupNames, allocate_sibling};
use super::copy::copy_subtree_logged;
use super::entry::FileEntry;
use super::options::{ConflictPolicy, CopyOptions};
use crate::errors::{Result, TreeError};

pub(super) fn delete_files<F, N, P>(fs: &F, names: &N, paths: &[P], safe_mode: bool) -> Result<()>
where
    F: Filesystem + ?Sized,
    N: BackupNames + ?Sized,
    P: AsRef<Path>,
{
    if let Some(dir) = paths.iter().map(AsRef::as_ref).find(|p| fs.is_dir(p)) {
        return Err(TreeError::InvalidArgument(format!(
            "'{}' is a directory; only files can be bulk deleted",
            dir.display()
        )));
    }

    let result = if safe_mode {
        delete_with_backups(fs, names, paths)
    } else {
        paths.iter().try_for_each(|p| remove_one(fs, p.as_ref()).map(drop))
    };
    match &result {
        Ok(()) => info!(count = paths.len(), safe_mode, "deleted files"),
        Err(e) => debug!(error = %e, safe_mode, "bulk delete failed"),
    }
    result
}

fn remove_one<F>(fs: &F, path: &Path) -> Result<FileEntry>
where
    F: Filesystem + ?Sized,
{
    let entry = fs.attributes(path).ok_or_else(|| TreeError::NotFound {
        op: "delete file",
        path: path.to_path_buf(),
    })?;
    fs.remove_file(entry.path())
        .map_err(TreeError::io("delete file", entry.path()))?;
    trace!(path = %entry.path().display(), "deleted file");
    Ok(entry)
}

fn delete_with_backups<F, N, P>(fs: &F, names: &N, paths: &[P]) -> Result<()>
where
    F: Filesystem + ?Sized,
    N: BackupNames + ?Sized,
    P: AsRef<Path>,
{
    let mut processed: Vec<FileEntry> = Vec::with_capacity(paths.len());
    let mut result = Ok(());

    for path in paths.iter().map(AsRef::as_ref) {
        match back_up(fs, names, path) {
            Ok(entry) => {
                let remove = fs
                    .remove_file(entry.path())
                    .map_err(TreeError::io("delete file", entry.path()));
                processed.push(entry);
                if let Err(e) = remove {
                    result = Err(e);
                    break;
                }
            }
            Err(e) => {
                result = Err(e);
                break;
            }
        }
    }

    let restore = result.is_err();
    for entry in processed.iter().rev() {
        let Some(backup) = entry.backup_path() else {
            continue;
        };
        if restore {
            put_back(fs, entry, backup);
        }
        if let Err(e) = fs.remove_file(backup) {
            warn!(backup = %backup.display(), error = %e, "failed to remove file backup");
        }
    }
    result
}

/// Copy `path` to a fresh sibling name and return its snapshot annotated with
/// the backup location.
fn back_up<F, N>(fs: &F, names: &N, path: &Path) -> Result<FileEntry>
where
    F: Filesystem + ?Sized,
    N: BackupNames + ?Sized,
{
    let entry = fs.attributes(path).ok_or_else(|| TreeError::NotFound {
        op: "back up file",
        path: path.to_path_buf(),
    })?;
    let parent = entry.parent().ok_or_else(|| {
        TreeError::InvalidArgument(format!("'{}' has no parent directory", entry.path().display()))
    })?;
    let backup = allocate_sibling(fs, names, parent)?;
    let name = backup.file_name().map(ToOwned::to_owned);
    copy_subtree_logged(
        fs,
        entry.path(),
        parent,
        name.as_deref(),
        CopyOptions::new(true, ConflictPolicy::Fail),
    )?;
    Ok(entry.with_backup_path(backup))
}

fn put_back<F>(fs: &F, entry: &FileEntry, backup: &Path)
where
    F: Filesystem + ?Sized,
{
    let Some(parent) = entry.parent() else {
        return;
    };
    let name = entry.path().file_name();
    let opts = CopyOptions::new(true, ConflictPolicy::Skip);
    if let Err(e) = copy_subtree_logged(fs, backup, parent, name, opts) {
        warn!(path = %entry.path().display(), error = %e, "failed to restore file from backup");
    }
}
