//! Credential model
//!
//! A username/password pair stored under a service name, and the full
//! service → credential mapping that is encrypted as one blob.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Login details for one service
///
/// Both fields are zeroed when the record is dropped.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct Credential {
    /// Account name at the service
    pub username: String,

    /// Account password at the service
    pub password: String,
}

impl Credential {
    /// Create a new credential
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// Never print the password
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// All credentials in the vault, keyed by service name
///
/// Serializes as a plain JSON object `{service: {username, password}}`.
/// Keys are kept sorted so listings are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialStore {
    entries: BTreeMap<String, Credential>,
}

impl CredentialStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the credential for a service
    ///
    /// Returns true if an existing record was overwritten.
    pub fn upsert(&mut self, service: impl Into<String>, credential: Credential) -> bool {
        self.entries.insert(service.into(), credential).is_some()
    }

    /// Get the credential for a service
    pub fn get(&self, service: &str) -> Option<&Credential> {
        self.entries.get(service)
    }

    /// Remove the credential for a service
    pub fn remove(&mut self, service: &str) -> Option<Credential> {
        self.entries.remove(service)
    }

    /// Service names in sorted order
    pub fn services(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Number of stored services
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
