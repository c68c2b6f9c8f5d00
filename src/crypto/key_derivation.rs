//! Key derivation from the master password
//!
//! Turns a master password into a 256-bit wrapping key. Argon2id is the
//! default, a memory-hard function resistant to GPU/ASIC attacks.
//! PBKDF2-HMAC-SHA256 is available for environments that need it, with an
//! enforced iteration floor.

use aes_gcm::aead::{rand_core::RngCore, OsRng};
use argon2::{Algorithm, Argon2, Params, Version};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{VaultError, VaultResult};

/// Length of derived and random keys in bytes (AES-256)
pub const KEY_LEN: usize = 32;

/// Length of the per-vault salt in bytes
pub const SALT_LEN: usize = 16;

/// Fewest PBKDF2 iterations accepted
pub const MIN_PBKDF2_ITERATIONS: u32 = 100_000;

/// Most PBKDF2 iterations accepted
pub const MAX_PBKDF2_ITERATIONS: u32 = 10_000_000;

/// Largest Argon2 memory cost accepted, in KiB (4 GiB)
pub const MAX_ARGON2_MEMORY_KIB: u32 = 4 * 1024 * 1024;

/// Largest Argon2 time cost accepted
pub const MAX_ARGON2_TIME_COST: u32 = 64;

/// Key derivation function and its cost parameters
///
/// Persisted in the key envelope header so the vault is always unwrapped
/// with the parameters it was created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "snake_case")]
pub enum KdfParams {
    /// Argon2id (v0x13)
    Argon2id {
        /// Memory cost in KiB (default: 65536 = 64 MiB)
        memory_cost: u32,
        /// Time cost (iterations, default: 3)
        time_cost: u32,
        /// Parallelism degree (default: 4)
        parallelism: u32,
    },
    /// PBKDF2 with HMAC-SHA256
    Pbkdf2Sha256 {
        /// Iteration count (default: 600000)
        iterations: u32,
    },
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::Argon2id {
            memory_cost: 65536, // 64 MiB
            time_cost: 3,
            parallelism: 4,
        }
    }
}

impl KdfParams {
    /// Default PBKDF2 parameters
    pub fn pbkdf2() -> Self {
        Self::Pbkdf2Sha256 {
            iterations: 600_000,
        }
    }

    /// Short algorithm name for display
    pub fn algorithm_name(&self) -> &'static str {
        match self {
            Self::Argon2id { .. } => "Argon2id",
            Self::Pbkdf2Sha256 { .. } => "PBKDF2-HMAC-SHA256",
        }
    }

    /// Check the parameters without running the derivation
    ///
    /// Costs are bounded on both sides: a header read from disk must not
    /// be able to make a derivation run for hours.
    pub fn validate(&self) -> VaultResult<()> {
        match *self {
            Self::Argon2id {
                memory_cost,
                time_cost,
                parallelism,
            } => {
                if memory_cost > MAX_ARGON2_MEMORY_KIB || time_cost > MAX_ARGON2_TIME_COST {
                    return Err(VaultError::Encryption(format!(
                        "Argon2 cost too high (memory {} KiB, time {}); limits are {} KiB and {}",
                        memory_cost, time_cost, MAX_ARGON2_MEMORY_KIB, MAX_ARGON2_TIME_COST
                    )));
                }
                Params::new(memory_cost, time_cost, parallelism, Some(KEY_LEN)).map_err(|e| {
                    VaultError::Encryption(format!("Invalid Argon2 parameters: {}", e))
                })?;
                Ok(())
            }
            Self::Pbkdf2Sha256 { iterations } => {
                if iterations < MIN_PBKDF2_ITERATIONS {
                    return Err(VaultError::Encryption(format!(
                        "PBKDF2 needs at least {} iterations (got {})",
                        MIN_PBKDF2_ITERATIONS, iterations
                    )));
                }
                if iterations > MAX_PBKDF2_ITERATIONS {
                    return Err(VaultError::Encryption(format!(
                        "PBKDF2 allows at most {} iterations (got {})",
                        MAX_PBKDF2_ITERATIONS, iterations
                    )));
                }
                Ok(())
            }
        }
    }
}

/// A 256-bit symmetric key, zeroed on drop
///
/// Used for both the password-derived wrapping key and the data key.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    key: [u8; KEY_LEN],
}

impl SecretKey {
    /// Wrap raw key bytes
    pub fn from_bytes(key: [u8; KEY_LEN]) -> Self {
        Self { key }
    }

    /// Generate a fresh random key from the OS RNG
    pub fn generate() -> Self {
        let mut key = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut key);
        Self { key }
    }

    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.key
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey([REDACTED])")
    }
}

/// Generate a random per-vault salt
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// Derive a key from a password
///
/// Deterministic in (password, salt, params).
pub fn derive_key(password: &str, salt: &[u8], params: &KdfParams) -> VaultResult<SecretKey> {
    if salt.len() < 8 {
        return Err(VaultError::Encryption(format!(
            "Salt too short: {} bytes",
            salt.len()
        )));
    }
    params.validate()?;

    let mut key = [0u8; KEY_LEN];
    match *params {
        KdfParams::Argon2id {
            memory_cost,
            time_cost,
            parallelism,
        } => {
            let argon2_params = Params::new(memory_cost, time_cost, parallelism, Some(KEY_LEN))
                .map_err(|e| {
                    VaultError::Encryption(format!("Invalid Argon2 parameters: {}", e))
                })?;
            let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params);
            argon2
                .hash_password_into(password.as_bytes(), salt, &mut key)
                .map_err(|e| VaultError::Encryption(format!("Key derivation failed: {}", e)))?;
        }
        KdfParams::Pbkdf2Sha256 { iterations } => {
            pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut key);
        }
    }

    let derived = SecretKey::from_bytes(key);
    key.zeroize();
    Ok(derived)
}

#[cfg(test)]
pub(crate) fn test_params() -> KdfParams {
    KdfParams::Argon2id {
        memory_cost: 64,
        time_cost: 1,
        parallelism: 1,
    }
}
