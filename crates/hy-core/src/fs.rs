//! Small filesystem helpers shared by every component that persists state.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use camino::Utf8Path;

/// Writes `contents` to `path` atomically.
///
/// A symlink is written through: the file it points to is replaced and the
/// link stays. The bytes go to a hidden sibling of that file first,
/// `.<name>.<pid>.tmp`, which receives the target's permission bits and is
/// then renamed over it. Readers observe either the old content or the new
/// content, never a truncated file. An existing entry at the temporary path
/// is never overwritten; the write fails instead.
///
/// # Errors
///
/// Returns the underlying I/O error if the path has no parent or file name,
/// if the temporary file already exists or cannot be written, or if the
/// rename fails. The target keeps its original content in every error case.
///
/// # Examples
///
/// ```
/// use camino::Utf8PathBuf;
///
/// let dir = tempfile::tempdir()?;
/// let path = Utf8PathBuf::from_path_buf(dir.path().join("state.json")).expect("utf-8 temp dir");
/// hy_core::fs::write_atomic(&path, b"{}")?;
/// assert_eq!(std::fs::read_to_string(&path)?, "{}");
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn write_atomic(path: &Utf8Path, contents: &[u8]) -> io::Result<()> {
    let target = match fs::canonicalize(path) {
        Ok(resolved) => resolved,
        Err(e) if e.kind() == io::ErrorKind::NotFound => path.as_std_path().to_path_buf(),
        Err(e) => return Err(e),
    };
    let tmp_path = temp_path_for(&target).ok_or_else(|| invalid_path(path))?;
    let permissions = fs::metadata(&target).ok().map(|meta| meta.permissions());

    let mut tmp = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)?;
    let written = tmp.write_all(contents).and_then(|()| match permissions {
        Some(permissions) => tmp.set_permissions(permissions),
        None => Ok(()),
    });
    drop(tmp);

    if let Err(e) = written.and_then(|()| fs::rename(&tmp_path, &target)) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    Ok(())
}

/// `.<name>.<pid>.tmp` next to `target`.
fn temp_path_for(target: &Path) -> Option<PathBuf> {
    let parent = target.parent()?;
    let name = target.file_name()?.to_str()?;
    Some(parent.join(format!(".{name}.{}.tmp", process::id())))
}

/// Creates `dir` and all of its parents if they do not exist yet.
///
/// # Errors
///
/// Returns the underlying I/O error if the directory cannot be created.
pub fn ensure_dir(dir: &Utf8Path) -> io::Result<()> {
    if dir.as_str().is_empty() || dir.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(dir)
}

fn invalid_path(path: &Utf8Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("invalid path for atomic write: {path}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    fn utf8_dir(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("temp dir should be UTF-8")
    }

    #[test]
    fn test_write_atomic_replaces_content() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let path = utf8_dir(&temp).join("file.tsx");

        write_atomic(&path, b"first").expect("first write");
        write_atomic(&path, b"second").expect("second write");

        assert_eq!(fs::read_to_string(&path).expect("read back"), "second");
        let entries = fs::read_dir(temp.path()).expect("list dir").count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_write_atomic_refuses_existing_temp_entry() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let path = utf8_dir(&temp).join("file.tsx");
        fs::write(&path, "original").expect("write original");
        let canonical = fs::canonicalize(&path).expect("canonicalize");
        let blocker = temp_path_for(&canonical).expect("temp path");
        fs::write(&blocker, "user data").expect("write blocker");

        assert!(write_atomic(&path, b"rewritten").is_err());
        assert_eq!(fs::read_to_string(&path).expect("read back"), "original");
        assert_eq!(fs::read_to_string(&blocker).expect("read blocker"), "user data");
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomic_writes_through_symlink() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let real = utf8_dir(&temp).join("Real.tsx");
        let link = utf8_dir(&temp).join("Link.tsx");
        fs::write(&real, "old").expect("write real");
        std::os::unix::fs::symlink(&real, &link).expect("create symlink");

        write_atomic(&link, b"new").expect("write through link");

        assert!(fs::symlink_metadata(&link).expect("stat link").file_type().is_symlink());
        assert_eq!(fs::read_to_string(&real).expect("read real"), "new");
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomic_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().expect("Failed to create temp dir");
        let path = utf8_dir(&temp).join("file.tsx");
        fs::write(&path, "old").expect("write");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).expect("chmod");

        write_atomic(&path, b"new").expect("write");

        let mode = fs::metadata(&path).expect("stat").permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
        assert_eq!(fs::read_to_string(&path).expect("read back"), "new");
    }

    #[test]
    fn test_write_atomic_missing_parent_fails() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let path = utf8_dir(&temp).join("missing").join("file.tsx");
        assert!(write_atomic(&path, b"data").is_err());
    }

    #[test]
    fn test_ensure_dir_nested() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let nested = utf8_dir(&temp).join("a").join("b");

        ensure_dir(&nested).expect("create nested");
        ensure_dir(&nested).expect("idempotent");
        assert!(nested.is_dir());
    }
}
