//! File I/O utilities with atomic writes
//!
//! Provides safe file operations that won't corrupt vault files on failure.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::error::VaultError;

/// Read a whole file, returning `None` if it doesn't exist
pub fn read_bytes<P: AsRef<Path>>(path: P) -> Result<Option<Vec<u8>>, VaultError> {
    let path = path.as_ref();

    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(VaultError::Io(format!(
            "Failed to read {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Write bytes to a file atomically (write to temp, then rename)
///
/// The file is either completely written or not modified at all, so a
/// crash mid-save never leaves a truncated vault file behind.
pub fn write_bytes_atomic<P: AsRef<Path>>(path: P, data: &[u8]) -> Result<(), VaultError> {
    let path = path.as_ref();

    // Ensure parent directory exists
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            VaultError::Io(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Temp file in same directory (important for atomic rename)
    let temp_path = temp_path_for(path);

    let file = File::create(&temp_path)
        .map_err(|e| VaultError::Io(format!("Failed to create temp file: {}", e)))?;

    if let Err(e) = write_and_sync(file, data) {
        remove_temp(&temp_path);
        return Err(VaultError::Io(format!("Failed to write temp file: {}", e)));
    }

    rename_with_fallback(&temp_path, path).map_err(|e| {
        VaultError::Io(format!("Failed to replace {}: {}", path.display(), e))
    })?;

    Ok(())
}

/// Read JSON from a file, returning a default value if file doesn't exist
pub fn read_json<T, P>(path: P) -> Result<T, VaultError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path)
        .map_err(|e| VaultError::Io(format!("Failed to open {}: {}", path.display(), e)))?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .map_err(|e| VaultError::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

fn write_and_sync(file: File, data: &[u8]) -> io::Result<()> {
    let mut writer = BufWriter::new(file);
    writer.write_all(data)?;
    writer.flush()?;
    // Sync to disk before rename
    writer.get_ref().sync_all()
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn remove_temp(temp_path: &Path) {
    if let Err(e) = fs::remove_file(temp_path) {
        tracing::warn!(path = %temp_path.display(), error = %e, "failed to remove temp file");
    }
}

/// Move the temp file over the destination. On failure the temp file is
/// removed and the destination is left as it was.
#[cfg(not(windows))]
fn rename_with_fallback(temp_path: &Path, destination: &Path) -> io::Result<()> {
    fs::rename(temp_path, destination).map_err(|e| {
        remove_temp(temp_path);
        e
    })
}

/// Windows variant: a destination held open by another process can make
/// rename refuse to overwrite, so that case gets one remove-and-retry. Any
/// other failure leaves the destination untouched.
#[cfg(windows)]
fn rename_with_fallback(temp_path: &Path, destination: &Path) -> io::Result<()> {
    let initial_err = match fs::rename(temp_path, destination) {
        Ok(()) => return Ok(()),
        Err(e) => e,
    };
    if !matches!(
        initial_err.kind(),
        io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
    ) {
        remove_temp(temp_path);
        return Err(initial_err);
    }

    if let Err(e) = fs::remove_file(destination) {
        tracing::warn!(path = %destination.display(), error = %e, "could not remove destination before retry");
    }
    fs::rename(temp_path, destination).map_err(|retry_err| {
        remove_temp(temp_path);
        io::Error::new(
            retry_err.kind(),
            format!(
                "atomic rename failed (initial: {}, retry: {})",
                initial_err, retry_err
            ),
        )
    })
}
