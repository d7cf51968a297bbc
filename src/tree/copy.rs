//! Recursive subtree copy.
//!
//! - The node itself is copied first (file bytes, link, or an empty
//!   directory), logged, then a directory's children are copied into it.
//! - Only paths this call created or overwrote are logged, including missing
//!   ancestors of the destination directory; an existing directory that is
//!   merged into is not.
//! - The first failing child aborts the walk. The top-level entry point then
//!   unwinds the log so no partial destination tree is left behind.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};

use super::backend::Filesystem;
use super::entry::{EntryKind, FileEntry};
use super::journal::{Action, CommitLog};
use super::options::{ConflictPolicy, CopyOptions};
use crate::errors::{Result, TreeError};

/// Copy `src` into `dest_dir` (as `dest_dir/<name>`), returning the log of
/// created destination paths. On failure everything created is removed
/// before the error is returned.
pub(super) fn copy_subtree_logged<F>(
    fs: &F,
    src: &Path,
    dest_dir: &Path,
    name: Option<&OsStr>,
    opts: CopyOptions,
) -> Result<CommitLog>
where
    F: Filesystem + ?Sized,
{
    let entry = fs.attributes(src).ok_or_else(|| TreeError::NotFound {
        op: "copy",
        path: src.to_path_buf(),
    })?;
    reject_copy_into_self(&entry, dest_dir)?;

    let mut log = CommitLog::new();
    let result = create_dest_dir(fs, dest_dir, &mut log)
        .and_then(|()| copy_node(fs, &entry, dest_dir, name, opts, &mut log));
    match result {
        Ok(()) => {
            info!(
                src = %src.display(),
                dest = %dest_dir.display(),
                created = log.len(),
                "copied subtree"
            );
            Ok(log)
        }
        Err(e) => {
            debug!(src = %src.display(), error = %e, created = log.len(), "copy failed; removing partial destination");
            discard_created(fs, log);
            Err(e)
        }
    }
}

/// Create `dest_dir` and its missing ancestors, outermost first, logging each.
fn create_dest_dir<F>(fs: &F, dest_dir: &Path, log: &mut CommitLog) -> Result<()>
where
    F: Filesystem + ?Sized,
{
    let missing: Vec<&Path> = dest_dir
        .ancestors()
        .take_while(|p| !p.as_os_str().is_empty() && !fs.exists(p))
        .collect();
    for dir in missing.into_iter().rev() {
        match fs.create_dir(dir) {
            Ok(()) => log.record(Action::Created(dir.to_path_buf())),
            // Lost a race with another creator; not ours to remove.
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists && fs.is_dir(dir) => {}
            Err(e) => return Err(TreeError::from_io("create destination directory", dir, e)),
        }
    }
    Ok(())
}

/// Remove every path in `log` that the copy created, newest first.
pub(super) fn discard_created<F>(fs: &F, log: CommitLog) -> usize
where
    F: Filesystem + ?Sized,
{
    log.unwind(|action| match action {
        Action::Created(path) => remove_created(fs, path),
        Action::Removed(_) => Ok(()),
    })
}

fn remove_created<F>(fs: &F, path: &Path) -> Result<()>
where
    F: Filesystem + ?Sized,
{
    match fs.attributes(path) {
        None => Ok(()),
        Some(e) if e.is_dir() => fs
            .remove_dir(path)
            .map_err(TreeError::io("remove copied directory", path)),
        Some(_) => fs
            .remove_file(path)
            .map_err(TreeError::io("remove copied file", path)),
    }
}

fn reject_copy_into_self(entry: &FileEntry, dest_dir: &Path) -> Result<()> {
    if !entry.is_dir() {
        return Ok(());
    }
    let dest = std::path::absolute(dest_dir).unwrap_or_else(|_| dest_dir.to_path_buf());
    if dest.starts_with(entry.path()) {
        return Err(TreeError::InvalidArgument(format!(
            "cannot copy '{}' into its own subtree '{}'",
            entry.path().display(),
            dest.display()
        )));
    }
    Ok(())
}

fn copy_node<F>(
    fs: &F,
    src: &FileEntry,
    dest_dir: &Path,
    name: Option<&OsStr>,
    opts: CopyOptions,
    log: &mut CommitLog,
) -> Result<()>
where
    F: Filesystem + ?Sized,
{
    let name = name
        .or_else(|| src.path().file_name())
        .ok_or_else(|| TreeError::InvalidArgument(format!("'{}' has no file name", src.path().display())))?;
    let dst = dest_dir.join(name);
    let existing = fs.attributes(&dst);

    match src.kind() {
        EntryKind::Directory => copy_dir(fs, src, &dst, existing, opts, log),
        EntryKind::File => {
            if !claim_leaf(fs, &dst, existing.as_ref(), opts.on_conflict)? {
                return Ok(());
            }
            fs.copy_file(src.path(), &dst, opts.on_conflict == ConflictPolicy::Replace)
                .map_err(TreeError::io("copy file", &dst))?;
            commit_created(fs, dst.clone(), log)?;
            if opts.copy_attributes {
                fs.copy_attributes(src.path(), &dst)
                    .map_err(TreeError::io("copy attributes", &dst))?;
            }
            trace!(src = %src.path().display(), dst = %dst.display(), "copied file");
            Ok(())
        }
        EntryKind::Symlink => {
            if !claim_leaf(fs, &dst, existing.as_ref(), opts.on_conflict)? {
                return Ok(());
            }
            fs.copy_symlink(src.path(), &dst, opts.on_conflict == ConflictPolicy::Replace)
                .map_err(TreeError::io("copy symbolic link", &dst))?;
            commit_created(fs, dst, log)
        }
        EntryKind::Other => Err(TreeError::InvalidArgument(format!(
            "'{}' is not a regular file, directory or symbolic link",
            src.path().display()
        ))),
    }
}

/// Conflict check for a file or link destination. `Ok(false)` means the
/// destination exists and is being skipped.
fn claim_leaf<F>(fs: &F, dst: &Path, existing: Option<&FileEntry>, policy: ConflictPolicy) -> Result<bool>
where
    F: Filesystem + ?Sized,
{
    let Some(existing) = existing else {
        return Ok(true);
    };
    match policy {
        ConflictPolicy::Skip => {
            trace!(dst = %dst.display(), "destination exists; skipped");
            Ok(false)
        }
        ConflictPolicy::Fail => Err(TreeError::AlreadyExists {
            op: "copy",
            path: dst.to_path_buf(),
        }),
        ConflictPolicy::Replace if existing.is_dir() => {
            // Only an empty directory can give way to a file.
            fs.remove_dir(dst)
                .map_err(TreeError::io("replace directory with file", dst))?;
            Ok(true)
        }
        ConflictPolicy::Replace => Ok(true),
    }
}

fn copy_dir<F>(
    fs: &F,
    src: &FileEntry,
    dst: &Path,
    existing: Option<FileEntry>,
    opts: CopyOptions,
    log: &mut CommitLog,
) -> Result<()>
where
    F: Filesystem + ?Sized,
{
    let created = match (existing, opts.on_conflict) {
        (None, _) => true,
        (Some(_), ConflictPolicy::Fail) => {
            return Err(TreeError::AlreadyExists {
                op: "copy",
                path: dst.to_path_buf(),
            });
        }
        (Some(e), _) if e.is_dir() => false,
        (Some(_), ConflictPolicy::Skip) => {
            trace!(dst = %dst.display(), "non-directory in the way; skipped");
            return Ok(());
        }
        (Some(_), ConflictPolicy::Replace) => {
            fs.remove_file(dst)
                .map_err(TreeError::io("replace file with directory", dst))?;
            true
        }
    };

    if created {
        fs.create_dir(dst).map_err(TreeError::io("create directory", dst))?;
        commit_created(fs, dst.to_path_buf(), log)?;
    }

    let children = fs
        .read_dir(src.path())
        .map_err(TreeError::io("read directory", src.path()))?;
    for child in children {
        let entry = fs.attributes(&child).ok_or_else(|| TreeError::NotFound {
            op: "copy",
            path: child.clone(),
        })?;
        copy_node(fs, &entry, dst, None, opts, log)?;
    }

    // After the children, so their creation does not bump the copied mtime.
    if created && opts.copy_attributes {
        fs.copy_attributes(src.path(), dst)
            .map_err(TreeError::io("copy attributes", dst))?;
    }
    Ok(())
}

fn commit_created<F>(fs: &F, path: PathBuf, log: &mut CommitLog) -> Result<()>
where
    F: Filesystem + ?Sized,
{
    if !fs.exists(&path) {
        return Err(TreeError::NotFound {
            op: "verify copied path",
            path,
        });
    }
    log.record(Action::Created(path));
    Ok(())
}
