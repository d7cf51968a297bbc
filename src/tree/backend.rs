//! Filesystem seam.
//!
//! The tree engine never touches `std::fs` directly; it goes through the
//! [`Filesystem`] trait so attribute lookups and primitive mutations can be
//! swapped (tests wrap [`StdFs`] to inject failures on chosen paths).
//!
//! All methods take paths as given and never follow symbolic links when
//! describing a node.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use super::atomic::copy_replacing;
use super::entry::FileEntry;
use super::io_copy::{DurabilityMode, copy_streaming};
use super::metadata::{preserve_metadata, preserve_xattrs};

/// Attribute provider plus the primitive operations the engine composes.
pub trait Filesystem {
    /// Snapshot of `path`, or `None` if it does not exist or cannot be read.
    fn attributes(&self, path: &Path) -> Option<FileEntry>;

    fn exists(&self, path: &Path) -> bool {
        self.attributes(path).is_some()
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.attributes(path).is_some_and(|e| e.is_dir())
    }

    fn is_file(&self, path: &Path) -> bool {
        self.attributes(path).is_some_and(|e| e.is_file())
    }

    /// Immediate children of a directory, ordered by file name.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    /// Create a single directory; fails if it exists.
    fn create_dir(&self, path: &Path) -> io::Result<()>;

    /// Create a directory and any missing parents; idempotent.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Copy file bytes. With `replace == false` an existing `dst` is an
    /// `AlreadyExists` error; otherwise its content is replaced.
    fn copy_file(&self, src: &Path, dst: &Path, replace: bool) -> io::Result<u64>;

    /// Recreate the symbolic link `src` at `dst` (the link, not its target).
    fn copy_symlink(&self, src: &Path, dst: &Path, replace: bool) -> io::Result<()>;

    /// Remove a file or symbolic link.
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Remove an empty directory.
    fn remove_dir(&self, path: &Path) -> io::Result<()>;

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Apply `src`'s timestamps and permissions to `dst`.
    fn copy_attributes(&self, src: &Path, dst: &Path) -> io::Result<()>;
}

/// [`Filesystem`] backed by the real OS.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFs {
    durability: DurabilityMode,
}

impl StdFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Variant that fsyncs every copied file before reporting success.
    pub fn durable() -> Self {
        Self {
            durability: DurabilityMode::Full,
        }
    }
}

impl Filesystem for StdFs {
    fn attributes(&self, path: &Path) -> Option<FileEntry> {
        match fs::symlink_metadata(path) {
            Ok(meta) => Some(FileEntry::from_metadata(path, &meta)),
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    debug!(path = %path.display(), error = %e, "attribute query failed");
                }
                None
            }
        }
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let mut children = Vec::new();
        let walker = WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name();
        for item in walker {
            match item {
                Ok(entry) => children.push(entry.into_path()),
                Err(e) if e.depth() == 0 => {
                    return Err(e
                        .into_io_error()
                        .unwrap_or_else(|| io::Error::other("directory walk failed")));
                }
                Err(e) => {
                    debug!(dir = %path.display(), error = %e, "skipping unreadable entry");
                }
            }
        }
        Ok(children)
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        fs::create_dir(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn copy_file(&self, src: &Path, dst: &Path, replace: bool) -> io::Result<u64> {
        if replace {
            copy_replacing(src, dst, self.durability)
        } else {
            copy_streaming(src, dst, self.durability)
        }
    }

    #[cfg(unix)]
    fn copy_symlink(&self, src: &Path, dst: &Path, replace: bool) -> io::Result<()> {
        let target = fs::read_link(src)?;
        if replace && fs::symlink_metadata(dst).is_ok_and(|m| !m.is_dir()) {
            fs::remove_file(dst)?;
        }
        std::os::unix::fs::symlink(target, dst)
    }

    #[cfg(not(unix))]
    fn copy_symlink(&self, src: &Path, _dst: &Path, _replace: bool) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("copying symbolic link '{}' is not supported here", src.display()),
        ))
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn copy_attributes(&self, src: &Path, dst: &Path) -> io::Result<()> {
        let meta = fs::symlink_metadata(src)?;
        if meta.file_type().is_symlink() {
            // Link permissions are meaningless and times would land on the target.
            return Ok(());
        }
        preserve_metadata(dst, &meta)?;
        preserve_xattrs(src, dst);
        Ok(())
    }
}
