//! Configuration module for passvault
//!
//! This module provides:
//! - vault directory resolution
//! - user settings persistence
//! - the explicit [`VaultConfig`] handed to the vault core

pub mod paths;
pub mod settings;

use std::path::PathBuf;

use crate::crypto::KdfParams;

pub use paths::VaultPaths;
pub use settings::Settings;

/// Everything the vault core needs to locate and create its files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultConfig {
    /// Encrypted credential store
    pub data_file: PathBuf,
    /// Wrapped data key
    pub key_file: PathBuf,
    /// Writer lock
    pub lock_file: PathBuf,
    /// KDF parameters for a newly created envelope
    pub kdf: KdfParams,
}

impl VaultConfig {
    /// Build a config from resolved paths and loaded settings
    pub fn new(paths: &VaultPaths, settings: &Settings) -> Self {
        Self {
            data_file: paths.data_file(),
            key_file: paths.key_file(),
            lock_file: paths.lock_file(),
            kdf: settings.kdf,
        }
    }

    /// Standard file layout inside `dir`
    pub fn in_dir(dir: impl Into<PathBuf>, kdf: KdfParams) -> Self {
        let paths = VaultPaths::with_base_dir(dir);
        Self {
            data_file: paths.data_file(),
            key_file: paths.key_file(),
            lock_file: paths.lock_file(),
            kdf,
        }
    }
}
