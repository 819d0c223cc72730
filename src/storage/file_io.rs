//! File I/O utilities with atomic writes
//!
//! Provides safe file operations that won't leave truncated output on failure.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::{Builder, NamedTempFile};

use crate::error::FileCipherError;

/// Prefix of staging files; the rest of the name is random
const TEMP_PREFIX: &str = ".filecipher-";

/// Read an entire file into memory
pub fn read_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, FileCipherError> {
    let path = path.as_ref();
    fs::read(path)
        .map_err(|e| FileCipherError::Io(format!("Failed to read {}: {}", path.display(), e)))
}

/// Write bytes to a file atomically (write to temp, then rename)
///
/// The destination is either completely written or not modified at all.
/// Any existing file at `path` is replaced. New files get the usual
/// umask-derived permissions.
pub fn write_bytes_atomic<P: AsRef<Path>>(path: P, data: &[u8]) -> Result<(), FileCipherError> {
    write_atomic(path.as_ref(), data, false)
}

/// Like [`write_bytes_atomic`], but the file is readable by its owner only
///
/// Used for key files, which are stored unencrypted.
pub fn write_secret_atomic<P: AsRef<Path>>(path: P, data: &[u8]) -> Result<(), FileCipherError> {
    write_atomic(path.as_ref(), data, true)
}

fn write_atomic(path: &Path, data: &[u8], owner_only: bool) -> Result<(), FileCipherError> {
    // Staging file lives in the same directory so the rename never crosses filesystems
    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent).map_err(|e| {
                FileCipherError::Io(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
            parent
        }
        None => Path::new("."),
    };

    // Dropping the temp file on any error path deletes it
    let mut temp = create_temp(dir, owner_only)?;

    temp.write_all(data)
        .map_err(|e| FileCipherError::Io(format!("Failed to write data: {}", e)))?;

    // Sync to disk before rename
    temp.as_file()
        .sync_all()
        .map_err(|e| FileCipherError::Io(format!("Failed to sync data: {}", e)))?;

    temp.persist(path).map_err(|e| {
        FileCipherError::Io(format!(
            "Failed to rename temp file to {}: {}",
            path.display(),
            e.error
        ))
    })?;

    Ok(())
}

fn create_temp(dir: &Path, owner_only: bool) -> Result<NamedTempFile, FileCipherError> {
    let mut builder = Builder::new();
    builder.prefix(TEMP_PREFIX).suffix(".tmp");

    // Mode is applied at creation, so secrets are never briefly world-readable
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = if owner_only { 0o600 } else { 0o666 };
        builder.permissions(fs::Permissions::from_mode(mode));
    }
    #[cfg(not(unix))]
    let _ = owner_only;

    builder
        .tempfile_in(dir)
        .map_err(|e| FileCipherError::Io(format!("Failed to create temp file: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.bin");

        write_bytes_atomic(&path, b"\x00\x01binary\xff").unwrap();
        assert!(path.exists());

        let loaded = read_bytes(&path).unwrap();
        assert_eq!(loaded, b"\x00\x01binary\xff");
    }

    #[test]
    fn test_atomic_write_no_temp_file_left() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.bin");

        write_bytes_atomic(&path, b"hello").unwrap();
        write_secret_atomic(&path, b"hello again").unwrap();

        assert_eq!(entries(temp_dir.path()), vec!["data.bin"]);
    }

    #[test]
    fn test_write_overwrites_existing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.bin");

        write_bytes_atomic(&path, b"a much longer first version").unwrap();
        write_bytes_atomic(&path, b"short").unwrap();

        assert_eq!(read_bytes(&path).unwrap(), b"short");
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("data.bin");

        write_bytes_atomic(&path, b"x").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_failed_write_leaves_nothing_behind() {
        let temp_dir = TempDir::new().unwrap();
        // A directory occupying the destination makes the rename fail
        let path = temp_dir.path().join("occupied");
        fs::create_dir_all(path.join("child")).unwrap();

        let result = write_bytes_atomic(&path, b"data");
        assert!(matches!(result, Err(FileCipherError::Io(_))));
        assert_eq!(entries(temp_dir.path()), vec!["occupied"]);
    }

    #[test]
    fn test_unrelated_dotfiles_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.bin");
        let neighbour = temp_dir.path().join(".data.bin.tmp");
        fs::write(&neighbour, b"user data").unwrap();

        write_bytes_atomic(&path, b"output").unwrap();

        assert_eq!(fs::read(&neighbour).unwrap(), b"user data");
        assert_eq!(entries(temp_dir.path()), vec![".data.bin.tmp", "data.bin"]);
    }

    #[test]
    fn test_concurrent_writers_do_not_collide() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("shared.bin");

        let handles: Vec<_> = (0..8u8)
            .map(|i| {
                let path = path.clone();
                std::thread::spawn(move || write_bytes_atomic(&path, &[i; 1024]))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        // One writer wins, completely
        let contents = read_bytes(&path).unwrap();
        assert_eq!(contents.len(), 1024);
        assert!(contents.iter().all(|b| *b == contents[0]));
        assert_eq!(entries(temp_dir.path()), vec!["shared.bin"]);
    }

    #[test]
    #[cfg(unix)]
    fn test_secret_write_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.key");
        fs::write(&path, b"old").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        write_secret_atomic(&path, b"new secret").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600, "Secret file should have 0600 permissions");
    }

    #[test]
    #[cfg(unix)]
    fn test_regular_write_is_not_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.bin");

        write_bytes_atomic(&path, b"public").unwrap();

        // Owner can always read and write; exact group/other bits depend on umask
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o600, 0o600);
        assert_eq!(mode & 0o111, 0);
    }

    #[test]
    fn test_read_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = read_bytes(temp_dir.path().join("nonexistent"));
        assert!(matches!(result, Err(FileCipherError::Io(_))));
    }
}
