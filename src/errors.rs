//! Typed error definitions for safe_tree.
//! Every failure surfaced by the tree engine is classified into one of a small
//! set of kinds so callers (and logs) can tell a conflict from a permission
//! problem without parsing messages.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::tree::helpers::describe_io_error;

/// Coarse classification of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Path vanished between check and use.
    NotFound,
    /// Conflict policy forbids overwriting an existing destination.
    AlreadyExists,
    /// Directory removal blocked by remaining children.
    NotEmpty,
    PermissionDenied,
    /// Attribute could not be applied on this platform/filesystem.
    UnsupportedAttribute,
    /// Any other I/O fault.
    IoFailure,
    /// Caller handed us something the operation cannot work with.
    InvalidArgument,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::AlreadyExists => "already_exists",
            ErrorKind::NotEmpty => "not_empty",
            ErrorKind::PermissionDenied => "permission_denied",
            ErrorKind::UnsupportedAttribute => "unsupported_attribute",
            ErrorKind::IoFailure => "io_failure",
            ErrorKind::InvalidArgument => "invalid_argument",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("{op} '{}': path not found", path.display())]
    NotFound { op: &'static str, path: PathBuf },

    #[error("{op} '{}': destination already exists", path.display())]
    AlreadyExists { op: &'static str, path: PathBuf },

    #[error("{op} '{}': directory not empty", path.display())]
    NotEmpty { op: &'static str, path: PathBuf },

    #[error("Permission denied on {}: {context}", path.display())]
    PermissionDenied { path: PathBuf, context: String },

    #[error("cannot apply {attribute} to '{}': {reason}", path.display())]
    UnsupportedAttribute {
        path: PathBuf,
        attribute: &'static str,
        reason: String,
    },

    #[error("{message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl TreeError {
    /// Classify an `io::Error` raised by `op` on `path`.
    pub fn from_io(op: &'static str, path: &Path, err: io::Error) -> Self {
        let path = path.to_path_buf();
        match err.kind() {
            io::ErrorKind::NotFound => TreeError::NotFound { op, path },
            io::ErrorKind::AlreadyExists => TreeError::AlreadyExists { op, path },
            io::ErrorKind::DirectoryNotEmpty => TreeError::NotEmpty { op, path },
            io::ErrorKind::PermissionDenied => TreeError::PermissionDenied {
                context: describe_io_error(op, &path, &err),
                path,
            },
            io::ErrorKind::Unsupported => TreeError::UnsupportedAttribute {
                reason: err.to_string(),
                attribute: op,
                path,
            },
            _ => TreeError::Io {
                message: describe_io_error(op, &path, &err),
                path,
                source: err,
            },
        }
    }

    /// Adapter for `.map_err(...)` at OS call sites.
    pub fn io<'a>(op: &'static str, path: &'a Path) -> impl FnOnce(io::Error) -> TreeError + 'a {
        move |e| TreeError::from_io(op, path, e)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            TreeError::NotFound { .. } => ErrorKind::NotFound,
            TreeError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            TreeError::NotEmpty { .. } => ErrorKind::NotEmpty,
            TreeError::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            TreeError::UnsupportedAttribute { .. } => ErrorKind::UnsupportedAttribute,
            TreeError::Io { .. } => ErrorKind::IoFailure,
            TreeError::InvalidArgument(_) => ErrorKind::InvalidArgument,
        }
    }

    /// Stable numeric code used for process exit status and structured logs.
    pub fn code(&self) -> i32 {
        match self.kind() {
            ErrorKind::NotFound => 2,
            ErrorKind::AlreadyExists => 3,
            ErrorKind::NotEmpty => 4,
            ErrorKind::PermissionDenied => 5,
            ErrorKind::UnsupportedAttribute => 6,
            ErrorKind::IoFailure => 7,
            ErrorKind::InvalidArgument => 8,
        }
    }

    /// Path the failure is about, when there is one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            TreeError::NotFound { path, .. }
            | TreeError::AlreadyExists { path, .. }
            | TreeError::NotEmpty { path, .. }
            | TreeError::PermissionDenied { path, .. }
            | TreeError::UnsupportedAttribute { path, .. }
            | TreeError::Io { path, .. } => Some(path),
            TreeError::InvalidArgument(_) => None,
        }
    }
}

pub type Result<T, E = TreeError> = std::result::Result<T, E>;
