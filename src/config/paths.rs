//! Path management for passvault
//!
//! Resolves the vault directory and the files inside it.
//!
//! ## Path Resolution Order
//!
//! 1. `PASSVAULT_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/passvault` or `~/.config/passvault`
//! 3. Windows: `%APPDATA%\passvault`

use std::path::{Path, PathBuf};

use crate::error::VaultError;

/// Environment variable overriding the vault directory
pub const VAULT_DIR_ENV: &str = "PASSVAULT_DIR";

/// Manages all paths used by passvault
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultPaths {
    /// Directory holding every vault file
    base_dir: PathBuf,
}

impl VaultPaths {
    /// Resolve the vault directory from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, VaultError> {
        let base_dir = match std::env::var_os(VAULT_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Use an explicit vault directory
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Get the vault directory
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Settings file (KDF defaults for new vaults)
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Wrapped data key
    pub fn key_file(&self) -> PathBuf {
        self.base_dir.join("master.key")
    }

    /// Encrypted credential store
    pub fn data_file(&self) -> PathBuf {
        self.base_dir.join("passwords.enc")
    }

    /// Writer lock
    pub fn lock_file(&self) -> PathBuf {
        self.base_dir.join("vault.lock")
    }
}

/// Resolve the default vault directory based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, VaultError> {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(xdg).join("passvault"));
    }
    let home = std::env::var_os("HOME")
        .ok_or_else(|| VaultError::Config("HOME environment variable not set".into()))?;
    Ok(PathBuf::from(home).join(".config").join("passvault"))
}

/// Resolve the default vault directory based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, VaultError> {
    let appdata = std::env::var_os("APPDATA")
        .ok_or_else(|| VaultError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("passvault"))
}
