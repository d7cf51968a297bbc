use std::fs::File;
use std::io;
use std::path::Path;

#[cfg(unix)]
pub(super) fn fsync_dir(dir: &Path) -> io::Result<()> {
    let f = File::open(dir)?;
    f.sync_all()
}

#[cfg(not(unix))]
pub(super) fn fsync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn fsync_of_missing_dir_fails() {
        let td = tempfile::tempdir().unwrap();
        assert!(fsync_dir(td.path()).is_ok());
        assert!(fsync_dir(&td.path().join("gone")).is_err());
    }
}
