//! File-tree engine: listing, copy, delete, bulk delete, move and rename.
//!
//! Every operation runs synchronously on the caller's thread and goes through
//! a [`Filesystem`] backend. Destructive operations keep a [`CommitLog`] of
//! completed steps so a partial failure can be undone in reverse order.

mod atomic;
mod backend;
mod backup;
mod bulk;
mod copy;
mod delete;
mod entry;
pub(crate) mod helpers;
mod io_copy;
mod journal;
mod list;
mod metadata;
mod options;
mod relocate;
mod util;

pub use backend::{Filesystem, StdFs};
pub use backup::{BackupNames, BackupRecord, SequentialNames, UuidNames};
pub use entry::{EntryKind, FileEntry, Timestamp};
pub use io_copy::DurabilityMode;
pub use journal::{Action, CommitLog};
pub use list::sort_entries;
pub use options::{
    ConflictPolicy, CopyOptions, ExtensionFilter, ListOptions, ListOptionsBuilder, SortOrder, SortSpec,
};

use std::path::{Path, PathBuf};

use crate::errors::Result;

/// Entry point bundling a filesystem backend and a backup-name generator.
///
/// ```no_run
/// use safe_tree::{FileTree, ListOptions};
///
/// let tree = FileTree::new();
/// let opts = ListOptions::builder().recursive(true).exclude_hidden(true).build();
/// for entry in tree.list("/tmp", &opts) {
///     println!("{}", entry.path().display());
/// }
/// ```
#[derive(Debug, Default)]
pub struct FileTree<F = StdFs, N = UuidNames> {
    fs: F,
    names: N,
}

impl FileTree {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<F: Filesystem, N: BackupNames> FileTree<F, N> {
    pub fn with_parts(fs: F, names: N) -> Self {
        Self { fs, names }
    }

    pub fn filesystem(&self) -> &F {
        &self.fs
    }

    /// Children of `dir` filtered and sorted per `opts`. Anything that is not
    /// a readable directory yields an empty list.
    pub fn list(&self, dir: impl AsRef<Path>, opts: &ListOptions) -> Vec<FileEntry> {
        list::list(&self.fs, dir.as_ref(), opts)
    }

    /// Copy `src` (file or directory) into `dest_dir`. A failed copy leaves
    /// none of the paths it created behind.
    pub fn copy_subtree(&self, src: impl AsRef<Path>, dest_dir: impl AsRef<Path>, opts: CopyOptions) -> Result<()> {
        self.copy_subtree_logged(src, dest_dir, opts).map(drop)
    }

    /// Like [`FileTree::copy_subtree`], returning the created paths in
    /// creation order.
    pub fn copy_subtree_logged(
        &self,
        src: impl AsRef<Path>,
        dest_dir: impl AsRef<Path>,
        opts: CopyOptions,
    ) -> Result<CommitLog> {
        copy::copy_subtree_logged(&self.fs, src.as_ref(), dest_dir.as_ref(), None, opts)
    }

    /// Copy with attribute preservation and replace-existing.
    pub fn copy_subtree_default(&self, src: impl AsRef<Path>, dest_dir: impl AsRef<Path>) -> Result<()> {
        self.copy_subtree(src, dest_dir, CopyOptions::default())
    }

    /// Delete `path` and everything under it, children before parents.
    ///
    /// With `safe_mode` the subtree is first copied to a sibling backup
    /// directory; if deletion fails part-way, removed entries are restored
    /// from it. The backup is always removed before returning.
    pub fn delete_subtree(&self, path: impl AsRef<Path>, safe_mode: bool) -> Result<CommitLog> {
        if safe_mode {
            delete::delete_subtree_safe(&self.fs, &self.names, path.as_ref())
        } else {
            delete::delete_subtree_plain(&self.fs, path.as_ref())
        }
    }

    /// Delete a flat set of files. Any directory in `paths` fails the call
    /// before anything is touched.
    pub fn delete_files<P: AsRef<Path>>(&self, paths: &[P], safe_mode: bool) -> Result<()> {
        bulk::delete_files(&self.fs, &self.names, paths, safe_mode)
    }

    /// Move `src` into `dest_dir`, returning the new path.
    pub fn move_subtree(&self, src: impl AsRef<Path>, dest_dir: impl AsRef<Path>, safe_mode: bool) -> Result<PathBuf> {
        relocate::move_subtree(&self.fs, &self.names, src.as_ref(), dest_dir.as_ref(), safe_mode)
    }

    /// Rename `path` within its parent directory.
    pub fn rename(&self, path: impl AsRef<Path>, new_name: &str) -> Result<PathBuf> {
        relocate::rename(&self.fs, path.as_ref(), new_name)
    }
}
