//! Core library for `safe_tree`.
//!
//! File-tree primitives (list, copy, delete, bulk delete, move, rename) whose
//! destructive operations can run in *safe mode*: the affected data is backed
//! up first and restored if the operation fails part-way, so a multi-file
//! change either completes or leaves the tree as it was.
//!
//! The engine lives in [`tree`]; [`FileTree`] bundles a filesystem backend
//! and a backup-name generator, and the free functions below run against the
//! real filesystem.

pub mod cli;
pub mod config;
pub mod errors;
pub mod output;
pub mod platform;
pub mod tree;

pub use config::{
    Config, LogLevel, config_path, create_template_config, default_config_path, default_log_path, load_config,
    load_config_from_xml_path, path_has_symlink_ancestor,
};
pub use errors::{ErrorKind, Result, TreeError};
pub use tree::{
    Action, BackupNames, BackupRecord, CommitLog, ConflictPolicy, CopyOptions, DurabilityMode, EntryKind,
    ExtensionFilter, FileEntry, FileTree, Filesystem, ListOptions, ListOptionsBuilder, SequentialNames, SortOrder,
    SortSpec, StdFs, Timestamp, UuidNames, sort_entries,
};

use std::path::{Path, PathBuf};

/// List `dir` on the real filesystem.
pub fn list(dir: impl AsRef<Path>, opts: &ListOptions) -> Vec<FileEntry> {
    FileTree::new().list(dir, opts)
}

/// Copy `src` into `dest_dir` on the real filesystem.
pub fn copy_subtree(src: impl AsRef<Path>, dest_dir: impl AsRef<Path>, opts: CopyOptions) -> Result<()> {
    FileTree::new().copy_subtree(src, dest_dir, opts)
}

/// Copy preserving attributes and replacing existing files.
pub fn copy_subtree_default(src: impl AsRef<Path>, dest_dir: impl AsRef<Path>) -> Result<()> {
    FileTree::new().copy_subtree_default(src, dest_dir)
}

/// Delete a file or directory tree, optionally in safe mode.
pub fn delete_subtree(path: impl AsRef<Path>, safe_mode: bool) -> Result<()> {
    FileTree::new().delete_subtree(path, safe_mode).map(drop)
}

/// Delete a flat set of files, optionally in safe mode.
pub fn delete_files<P: AsRef<Path>>(paths: &[P], safe_mode: bool) -> Result<()> {
    FileTree::new().delete_files(paths, safe_mode)
}

/// Move `src` into `dest_dir`, returning the new path.
pub fn move_subtree(src: impl AsRef<Path>, dest_dir: impl AsRef<Path>, safe_mode: bool) -> Result<PathBuf> {
    FileTree::new().move_subtree(src, dest_dir, safe_mode)
}

/// Rename `path` within its parent directory.
pub fn rename(path: impl AsRef<Path>, new_name: &str) -> Result<PathBuf> {
    FileTree::new().rename(path, new_name)
}

/// Commonly used items for library consumers.
pub mod prelude {
    pub use crate::errors::{ErrorKind, Result as TreeResult, TreeError};
    pub use crate::tree::{
        ConflictPolicy, CopyOptions, EntryKind, FileEntry, FileTree, Filesystem, ListOptions, SortOrder, StdFs,
        Timestamp,
    };
    pub use crate::{copy_subtree, delete_files, delete_subtree, list, move_subtree, rename};
}
