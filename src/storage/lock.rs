//! Single-writer lock for the vault directory
//!
//! The lock is a marker file created with `create_new`, so exactly one
//! process can hold it. It is removed when the guard drops. A crash can
//! leave a stale lock behind; the error message names the file to delete.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{VaultError, VaultResult};

/// Held while a read-modify-write of the vault is in progress
#[derive(Debug)]
pub struct VaultLock {
    path: PathBuf,
}

impl VaultLock {
    /// Take the lock, failing fast if another writer holds it
    pub fn acquire(path: impl AsRef<Path>) -> VaultResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(mut file) => {
                // Owner pid, for whoever finds a stale lock
                let _ = writeln!(file, "{}", std::process::id());
                tracing::debug!(path = %path.display(), "vault lock acquired");
                Ok(Self {
                    path: path.to_path_buf(),
                })
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(VaultError::Locked(
                format!(
                    "another process is writing to the vault (remove {} if no other passvault is running)",
                    path.display()
                ),
            )),
            Err(e) => Err(VaultError::Io(format!(
                "Failed to create lock file {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Path of the lock file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for VaultLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to release vault lock");
        }
    }
}
