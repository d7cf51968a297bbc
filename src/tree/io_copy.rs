//! Streaming file copy.
//!
//! - The destination is always created with `create_new` (O_EXCL), so this
//!   layer never clobbers anything; replacement is done one level up by
//!   copying to a temp sibling and renaming over the target.
//! - Linux tries `copy_file_range` first and falls back to buffered I/O.
//!
//! Snapshot semantics: the source is read once from start to EOF; bytes
//! appended concurrently after EOF was observed are not included.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

/// Post-write flush behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DurabilityMode {
    /// Data reaches the OS page cache; no disk barrier.
    #[default]
    Data,
    /// `sync_all` the destination before returning.
    Full,
}

const BUF_SIZE: usize = 1024 * 1024;

/// Copy `src` -> new file `dst`. Returns bytes written.
/// Fails with `AlreadyExists` if `dst` is present. A partially written `dst`
/// is removed before the error is returned.
pub(super) fn copy_streaming(src: &Path, dst: &Path, mode: DurabilityMode) -> io::Result<u64> {
    let src_f = File::open(src)?;
    let dst_f = OpenOptions::new().write(true).create_new(true).open(dst)?;
    fill(src_f, dst_f, mode).inspect_err(|_| {
        let _ = fs::remove_file(dst);
    })
}

fn fill(src_f: File, dst_f: File, mode: DurabilityMode) -> io::Result<u64> {
    #[cfg(target_os = "linux")]
    {
        if let Some(bytes) = copy_in_kernel(&src_f, &dst_f)? {
            if mode == DurabilityMode::Full {
                dst_f.sync_all()?;
            }
            return Ok(bytes);
        }
    }

    let mut reader = BufReader::with_capacity(BUF_SIZE, src_f);
    let mut writer = BufWriter::with_capacity(BUF_SIZE, dst_f);
    let bytes = io::copy(&mut reader, &mut writer)?;
    writer.flush()?;

    if mode == DurabilityMode::Full {
        writer.get_ref().sync_all()?;
    }
    Ok(bytes)
}

/// `copy_file_range` loop. `Ok(None)` means unsupported before any byte moved;
/// the caller then streams instead.
#[cfg(target_os = "linux")]
fn copy_in_kernel(src: &File, dst: &File) -> io::Result<Option<u64>> {
    use std::os::unix::io::AsRawFd;

    const CHUNK: usize = 16 * 1024 * 1024;
    let mut total: u64 = 0;
    loop {
        // SAFETY: both descriptors are open for the duration of the call; null
        // offsets make the kernel use and advance the file positions.
        let rc = unsafe {
            libc::copy_file_range(
                src.as_raw_fd(),
                std::ptr::null_mut(),
                dst.as_raw_fd(),
                std::ptr::null_mut(),
                CHUNK,
                0,
            )
        };
        if rc > 0 {
            total += rc as u64;
            continue;
        }
        if rc == 0 {
            return Ok(Some(total));
        }
        let err = io::Error::last_os_error();
        let unsupported = matches!(
            err.raw_os_error(),
            Some(code) if code == libc::EXDEV
                || code == libc::ENOSYS
                || code == libc::EINVAL
                || code == libc::EPERM
                || code == libc::EOPNOTSUPP
        );
        if total == 0 && unsupported {
            return Ok(None);
        }
        return Err(err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn copy_small_file_ok() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src.txt");
        let dst = dir.path().join("dst.txt");
        fs::write(&src, b"hello world").unwrap();

        let n = copy_streaming(&src, &dst, DurabilityMode::Data).unwrap();
        assert_eq!(n, 11);
        assert_eq!(fs::read(&dst).unwrap(), b"hello world");
    }

    #[test]
    fn copy_zero_length_ok() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("empty");
        let dst = dir.path().join("out");
        File::create(&src).unwrap();

        let n = copy_streaming(&src, &dst, DurabilityMode::Full).unwrap();
        assert_eq!(n, 0);
        assert_eq!(fs::metadata(&dst).unwrap().len(), 0);
    }

    #[test]
    fn refuses_existing_destination() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let dst = dir.path().join("dst");
        fs::write(&src, b"data").unwrap();
        fs::write(&dst, b"x").unwrap();

        let err = copy_streaming(&src, &dst, DurabilityMode::Data).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read(&dst).unwrap(), b"x");
    }

    #[test]
    fn large_file_crosses_buffer_boundaries() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("big.bin");
        let dst = dir.path().join("big.out");
        let size = 2 * BUF_SIZE + 123;
        let data: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();
        fs::write(&src, &data).unwrap();

        let n = copy_streaming(&src, &dst, DurabilityMode::Data).unwrap();
        assert_eq!(n as usize, size);
        assert_eq!(fs::read(&dst).unwrap(), data);
    }
}
