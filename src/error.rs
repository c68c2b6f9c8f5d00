//! Custom error types for passvault
//!
//! This module defines the error hierarchy for the vault using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for vault operations
#[derive(Error, Debug)]
pub enum VaultError {
    /// A vault file required for a read does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The store decrypted fine but has no record for the service
    #[error("No entry found for service: {0}")]
    NoSuchService(String),

    /// Authentication failed: wrong master password or corrupted file.
    /// The two cases cannot be told apart.
    #[error("Bad key or corrupt data: {0}")]
    BadKeyOrCorruptData(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Key derivation or cipher setup errors
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Invalid caller input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Another process is writing to the vault
    #[error("Vault is locked: {0}")]
    Locked(String),

    /// The system clipboard could not be opened or written
    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

impl VaultError {
    /// Create a "no such service" error
    pub fn no_such_service(service: impl Into<String>) -> Self {
        Self::NoSuchService(service.into())
    }

    /// Create a "bad key or corrupt data" error
    pub fn bad_key(detail: impl Into<String>) -> Self {
        Self::BadKeyOrCorruptData(detail.into())
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is a wrong-password / corruption error
    pub fn is_bad_key(&self) -> bool {
        matches!(self, Self::BadKeyOrCorruptData(_))
    }
}

impl From<std::io::Error> for VaultError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<arboard::Error> for VaultError {
    fn from(err: arboard::Error) -> Self {
        Self::Clipboard(err.to_string())
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for vault operations
pub type VaultResult<T> = Result<T, VaultError>;
