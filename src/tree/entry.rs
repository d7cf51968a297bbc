//! Point-in-time snapshot of a single path.
//!
//! A `FileEntry` is built from `symlink_metadata`, so links are described as
//! links and never resolved. Entries are immutable apart from the backup-path
//! annotation that safe-mode bookkeeping attaches.

use serde::Serialize;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// What kind of node a path refers to (without following links).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    /// Sockets, FIFOs, device nodes.
    Other,
}

/// Timestamp selectable for sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    Modified,
    Accessed,
    Created,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    full_name: String,
    stem: String,
    extension: Option<String>,
    path: PathBuf,
    parent: Option<PathBuf>,
    kind: EntryKind,
    hidden: bool,
    readable: bool,
    writable: bool,
    executable: bool,
    size: u64,
    created: Option<SystemTime>,
    accessed: Option<SystemTime>,
    modified: Option<SystemTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    backup_path: Option<PathBuf>,
}

impl FileEntry {
    /// Build a snapshot from metadata obtained with `symlink_metadata`.
    pub fn from_metadata(path: &Path, meta: &Metadata) -> Self {
        let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let full_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| full_name.clone());
        let extension = path.extension().map(|e| e.to_string_lossy().into_owned());
        let parent = path.parent().map(Path::to_path_buf);

        let ft = meta.file_type();
        let kind = if ft.is_symlink() {
            EntryKind::Symlink
        } else if ft.is_dir() {
            EntryKind::Directory
        } else if ft.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        };

        let (readable, writable, executable) = access_flags(&path, meta);

        Self {
            hidden: is_hidden(&full_name, meta),
            full_name,
            stem,
            extension,
            parent,
            kind,
            readable,
            writable,
            executable,
            size: meta.len(),
            created: meta.created().ok(),
            accessed: meta.accessed().ok(),
            modified: meta.modified().ok(),
            backup_path: None,
            path,
        }
    }

    /// Attach the location of this entry's backup copy.
    pub fn with_backup_path(mut self, backup: impl Into<PathBuf>) -> Self {
        self.backup_path = Some(backup.into());
        self
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn parent(&self) -> Option<&Path> {
        self.parent.as_deref()
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_symlink(&self) -> bool {
        self.kind == EntryKind::Symlink
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_readable(&self) -> bool {
        self.readable
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }

    pub fn is_executable(&self) -> bool {
        self.executable
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn created(&self) -> Option<SystemTime> {
        self.created
    }

    pub fn accessed(&self) -> Option<SystemTime> {
        self.accessed
    }

    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    pub fn timestamp(&self, which: Timestamp) -> Option<SystemTime> {
        match which {
            Timestamp::Modified => self.modified,
            Timestamp::Accessed => self.accessed,
            Timestamp::Created => self.created,
        }
    }

    pub fn backup_path(&self) -> Option<&Path> {
        self.backup_path.as_deref()
    }
}

#[cfg(unix)]
fn is_hidden(name: &str, _meta: &Metadata) -> bool {
    name.starts_with('.')
}

#[cfg(windows)]
fn is_hidden(name: &str, meta: &Metadata) -> bool {
    use std::os::windows::fs::MetadataExt;
    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
    meta.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0 || name.starts_with('.')
}

#[cfg(not(any(unix, windows)))]
fn is_hidden(name: &str, _meta: &Metadata) -> bool {
    name.starts_with('.')
}

/// Effective (readable, writable, executable) for the calling process.
#[cfg(unix)]
fn access_flags(path: &Path, _meta: &Metadata) -> (bool, bool, bool) {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return (false, false, false);
    };
    // SAFETY: c_path is a valid NUL-terminated string for the duration of the calls.
    let check = |mode| unsafe { libc::access(c_path.as_ptr(), mode) == 0 };
    (check(libc::R_OK), check(libc::W_OK), check(libc::X_OK))
}

#[cfg(not(unix))]
fn access_flags(path: &Path, meta: &Metadata) -> (bool, bool, bool) {
    let executable = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_ascii_lowercase().as_str(), "exe" | "bat" | "cmd" | "com"))
        .unwrap_or(false);
    (true, !meta.permissions().readonly(), executable)
}
