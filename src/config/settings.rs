//! User settings for passvault
//!
//! Settings only affect vault creation: the KDF parameters written into a
//! new key envelope. An existing vault always uses the parameters stored in
//! its envelope header.

use serde::{Deserialize, Serialize};

use super::paths::VaultPaths;
use crate::crypto::KdfParams;
use crate::error::VaultError;
use crate::storage::read_json;

/// User settings for passvault
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Key derivation used when a new vault is created
    #[serde(default)]
    pub kdf: KdfParams,
}

fn default_schema_version() -> u32 {
    1
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            kdf: KdfParams::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist
    pub fn load_or_default(paths: &VaultPaths) -> Result<Self, VaultError> {
        let settings: Settings = read_json(paths.settings_file())?;
        settings.kdf.validate().map_err(|e| {
            VaultError::Config(format!(
                "Invalid kdf in {}: {}",
                paths.settings_file().display(),
                e
            ))
        })?;
        Ok(settings)
    }
}
