//! Encrypted credential store
//!
//! The whole service → credential mapping is one JSON document encrypted
//! under the data key. Every write re-encrypts and rewrites the entire
//! file; there are no partial updates.
//!
//! File layout: `magic "PVRS" (4) | version (1) | nonce (12) | ciphertext + tag`.
//! The 5-byte header is authenticated as associated data.

use std::path::{Path, PathBuf};

use zeroize::Zeroizing;

use crate::crypto::{decrypt_string, encrypt_with_aad, SecretKey};
use crate::error::{VaultError, VaultResult};
use crate::models::CredentialStore;
use crate::storage::{read_bytes, write_bytes_atomic};

// Magic followed by format version 1
const HEADER: [u8; 5] = *b"PVRS\x01";

/// Owner of the encrypted store file
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    /// Create a store handle for `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check whether the store file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Decrypt and parse the store
    ///
    /// Returns `None` if the file doesn't exist yet.
    pub fn load(&self, key: &SecretKey) -> VaultResult<Option<CredentialStore>> {
        let Some(bytes) = read_bytes(&self.path)? else {
            return Ok(None);
        };

        if bytes.len() < HEADER.len() || bytes[..HEADER.len()] != HEADER {
            return Err(VaultError::bad_key("not a passvault record store"));
        }

        let json = decrypt_string(&bytes[HEADER.len()..], key, &HEADER)?;
        let store: CredentialStore = serde_json::from_str(&json)
            .map_err(|e| VaultError::Json(format!("Failed to parse record store: {}", e)))?;

        tracing::debug!(path = %self.path.display(), services = store.len(), "loaded record store");
        Ok(Some(store))
    }

    /// Encrypt the full store and atomically replace the file
    pub fn save_all(&self, store: &CredentialStore, key: &SecretKey) -> VaultResult<()> {
        let json = Zeroizing::new(serde_json::to_vec(store)?);
        let ciphertext = encrypt_with_aad(&json, key, &HEADER)?;

        let mut file = Vec::with_capacity(HEADER.len() + ciphertext.len());
        file.extend_from_slice(&HEADER);
        file.extend_from_slice(&ciphertext);
        write_bytes_atomic(&self.path, &file)?;

        tracing::debug!(path = %self.path.display(), services = store.len(), "rewrote record store");
        Ok(())
    }
}
