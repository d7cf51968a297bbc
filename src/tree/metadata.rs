//! Attribute preservation.
//! - Copies timestamps (atime, mtime) and, on Unix, permission bits from a
//!   source node onto a freshly created destination.
//! - Failures are returned so the copier can classify them; xattrs (feature
//!   `xattrs`) stay best-effort and only log.

use filetime::{FileTime, set_file_times};
use std::fs;
use std::io;
use std::path::Path;
use tracing::trace;

/// Apply `src_meta`'s times and permissions to `dest`.
pub fn preserve_metadata(dest: &Path, src_meta: &fs::Metadata) -> io::Result<()> {
    let (at, mt) = file_times(src_meta);
    set_file_times(dest, at, mt)?;
    trace!(path = %dest.display(), "set atime/mtime on destination");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let src_mode = src_meta.permissions().mode() & 0o777;
        fs::set_permissions(dest, fs::Permissions::from_mode(src_mode))?;
        trace!(path = %dest.display(), mode = format!("{:o}", src_mode), "set permissions on destination");
    }

    #[cfg(windows)]
    {
        let mut perms = fs::metadata(dest)?.permissions();
        perms.set_readonly(src_meta.permissions().readonly());
        fs::set_permissions(dest, perms)?;
    }

    Ok(())
}

#[cfg(unix)]
fn file_times(meta: &fs::Metadata) -> (FileTime, FileTime) {
    use std::os::unix::fs::MetadataExt;
    let mt = FileTime::from_unix_time(meta.mtime(), meta.mtime_nsec() as u32);
    let at = FileTime::from_unix_time(meta.atime(), meta.atime_nsec() as u32);
    (at, mt)
}

#[cfg(not(unix))]
fn file_times(meta: &fs::Metadata) -> (FileTime, FileTime) {
    let mt = FileTime::from_last_modification_time(meta);
    let at = FileTime::from_last_access_time(meta);
    (at, mt)
}

/// Copy extended attributes from `src` to `dest` (no-op without `xattrs`).
pub fn preserve_xattrs(src: &Path, dest: &Path) {
    #[cfg(feature = "xattrs")]
    {
        use tracing::warn;
        let names = match xattr::list(src) {
            Ok(names) => names,
            Err(e) => {
                warn!(src = %src.display(), error = %e, "failed to list xattrs; continuing");
                return;
            }
        };
        for name in names {
            let name_disp = name.to_string_lossy().into_owned();
            match xattr::get(src, &name) {
                Ok(value) => {
                    let value = value.unwrap_or_default();
                    if let Err(e) = xattr::set(dest, &name, &value) {
                        warn!(dest = %dest.display(), xattr = %name_disp, error = %e, "failed to set xattr on destination");
                    } else {
                        trace!(dest = %dest.display(), xattr = %name_disp, size = value.len(), "preserved xattr");
                    }
                }
                Err(e) => {
                    warn!(src = %src.display(), xattr = %name_disp, error = %e, "failed to read xattr value from source");
                }
            }
        }
    }
    #[cfg(not(feature = "xattrs"))]
    {
        let _ = (src, dest);
    }
}
