//! I/O error description helpers.
//!
//! Turns a raw `io::Error` into a one-line message carrying the operation, the
//! path and, where the OS code is recognised, a short actionable hint. Used by
//! `TreeError::from_io` so every classified failure logs the same way.

use std::io;
use std::path::Path;

/// Hint for a raw OS error code, if we have one.
fn os_code_hint(code: i32) -> Option<&'static str> {
    #[cfg(unix)]
    {
        match code {
            libc::EACCES | libc::EPERM => {
                Some("permission denied; check ownership and write permissions")
            }
            libc::EXDEV => Some("cross-filesystem; atomic rename not possible"),
            libc::EBUSY => Some("resource busy; another process holds it"),
            libc::ENOENT => Some("path not found; it may have vanished mid-operation"),
            libc::EEXIST => Some("already exists; conflict policy forbids overwrite"),
            libc::ENOTEMPTY => Some("directory not empty"),
            libc::ENOSPC => Some("insufficient space on device"),
            libc::EROFS => Some("read-only filesystem; cannot write here"),
            libc::ELOOP => Some("too many symbolic link levels; possible symlink cycle"),
            libc::ENAMETOOLONG => Some("filename or path too long"),
            libc::EMFILE => Some("process file descriptor limit reached"),
            libc::ENFILE => Some("system-wide file table overflow"),
            _ => None,
        }
    }
    #[cfg(windows)]
    {
        match code {
            5 => Some("access denied; check permissions"),
            2 | 3 => Some("path not found; it may have vanished mid-operation"),
            32 => Some("sharing violation; file is in use"),
            80 | 183 => Some("already exists; conflict policy forbids overwrite"),
            145 => Some("directory not empty"),
            112 => Some("insufficient disk space"),
            19 => Some("write protected / read-only media"),
            206 => Some("filename or path too long"),
            _ => None,
        }
    }
    #[cfg(not(any(unix, windows)))]
    {
        let _ = code;
        None
    }
}

/// Hint by `ErrorKind` when no raw OS code is available (synthetic errors).
fn kind_hint(kind: io::ErrorKind) -> Option<&'static str> {
    match kind {
        io::ErrorKind::PermissionDenied => {
            Some("permission denied; check ownership and write permissions")
        }
        io::ErrorKind::NotFound => Some("path not found; it may have vanished mid-operation"),
        io::ErrorKind::AlreadyExists => Some("already exists; conflict policy forbids overwrite"),
        io::ErrorKind::DirectoryNotEmpty => Some("directory not empty"),
        io::ErrorKind::Unsupported => Some("operation not supported by this filesystem"),
        _ => None,
    }
}

/// Format `"<op> '<path>': <error>: <hint> [os code: N]"`.
pub fn describe_io_error(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);
    match e.raw_os_error() {
        Some(code) => {
            if let Some(hint) = os_code_hint(code) {
                msg.push_str(": ");
                msg.push_str(hint);
            }
            msg.push_str(&format!(" [os code: {code}]"));
        }
        None => {
            if let Some(hint) = kind_hint(e.kind()) {
                msg.push_str(": ");
                msg.push_str(hint);
            }
        }
    }
    msg
}
