//! Temp-file-then-rename writes.
//!
//! The target is only replaced once the new content has been fully written
//! and synced, so a failed save leaves the previous file intact.

use crate::common::{Error, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Directory a file lives in; bare relative names live in `.`.
pub(crate) fn parent_dir_or_dot(path: &Path) -> &Path {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

/// Write `dest` through a temporary sibling file.
///
/// If `write_fn` fails the temporary file is removed and `dest` is left
/// untouched.
pub(crate) fn atomic_write<T>(
    dest: &Path,
    write_fn: impl FnOnce(&mut File) -> Result<T>,
) -> Result<T> {
    let dir = parent_dir_or_dot(dest);
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| Error::file_access(dest, e))?;
    let out = write_fn(tmp.as_file_mut())?;

    tmp.as_file_mut().flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(dest)
        .map_err(|e| Error::file_access(dest, e.error))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_write_replaces_target() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.txt");
        std::fs::write(&dest, "old").unwrap();

        atomic_write(&dest, |file| Ok(file.write_all(b"new")?)).unwrap();
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "new");
    }

    #[test]
    fn test_failed_write_keeps_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.txt");
        std::fs::write(&dest, "old").unwrap();

        let result: Result<()> = atomic_write(&dest, |file| {
            file.write_all(b"partial")?;
            Err(Error::Xml("boom".to_string()))
        });
        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "old");
        // only the original file remains
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_missing_directory_is_file_access_error() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("no/such/dir/out.txt");
        let err = atomic_write(&dest, |_| Ok(())).unwrap_err();
        assert!(matches!(err, Error::FileAccess { .. }));
    }

    #[test]
    fn test_parent_dir_or_dot() {
        assert_eq!(parent_dir_or_dot(Path::new("a.odt")), Path::new("."));
        assert_eq!(parent_dir_or_dot(Path::new("x/a.odt")), Path::new("x"));
    }
}
