//! Replace-existing file copy: write to a temp sibling, then rename over the
//! target. Readers of `dst` see either the old bytes or the new ones.

use std::fs;
use std::io;
use std::path::Path;

use super::io_copy::{DurabilityMode, copy_streaming};
use super::util::fsync_dir;
use crate::platform::unique_temp_path;

pub(super) fn copy_replacing(src: &Path, dst: &Path, mode: DurabilityMode) -> io::Result<u64> {
    let dst_dir = dst
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "destination has no parent"))?;

    let tmp = unique_temp_path(dst_dir);
    let bytes = copy_streaming(src, &tmp, mode)?;

    if let Err(e) = rename_over(&tmp, dst) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }

    if mode == DurabilityMode::Full {
        // Rename already happened; a failed directory fsync must not turn it into an error.
        let _ = fsync_dir(dst_dir);
    }
    Ok(bytes)
}

fn rename_over(tmp: &Path, dst: &Path) -> io::Result<()> {
    // Windows rename does not replace an existing file.
    #[cfg(windows)]
    {
        if let Err(e) = fs::remove_file(dst) {
            if e.kind() != io::ErrorKind::NotFound {
                return Err(e);
            }
        }
    }
    fs::rename(tmp, dst)
}
