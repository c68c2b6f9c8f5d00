//! Key envelope: the data key, wrapped under the master password
//!
//! The data-encryption key (DEK) is 32 random bytes generated once per
//! vault. It is stored encrypted under a wrapping key derived from the
//! master password, so the password is never stored and the DEK never
//! touches disk in the clear.
//!
//! File layout (94 bytes, integers little-endian):
//!
//! ```text
//! magic "PVKE" (4) | version (1) | kdf id (1) | kdf params 3 x u32 (12)
//! | salt (16) | nonce (12) | AES-256-GCM(DEK) + tag (48)
//! ```
//!
//! The 34-byte header is authenticated as associated data, so a tampered
//! salt or cost parameter is rejected just like a wrong password.

use std::path::{Path, PathBuf};

use zeroize::{Zeroize, Zeroizing};

use crate::crypto::encryption::OVERHEAD;
use crate::crypto::{
    decrypt_with_aad, derive_key, encrypt_with_aad, generate_salt, KdfParams, SecretKey, KEY_LEN,
    SALT_LEN,
};
use crate::error::{VaultError, VaultResult};
use crate::storage::{read_bytes, write_bytes_atomic};

const MAGIC: &[u8; 4] = b"PVKE";
const VERSION: u8 = 1;

const KDF_ARGON2ID: u8 = 1;
const KDF_PBKDF2_SHA256: u8 = 2;

/// Size of the plaintext header
pub const HEADER_LEN: usize = 4 + 1 + 1 + 12 + SALT_LEN;

/// Total size of a key envelope file
pub const ENVELOPE_LEN: usize = HEADER_LEN + OVERHEAD + KEY_LEN;

/// Public part of a key envelope, readable without the password
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeHeader {
    /// Parameters the wrapping key is derived with
    pub kdf: KdfParams,
    /// Per-vault random salt
    pub salt: [u8; SALT_LEN],
}

impl EnvelopeHeader {
    fn encode(&self) -> [u8; HEADER_LEN] {
        let (kdf_id, params) = match self.kdf {
            KdfParams::Argon2id {
                memory_cost,
                time_cost,
                parallelism,
            } => (KDF_ARGON2ID, [memory_cost, time_cost, parallelism]),
            KdfParams::Pbkdf2Sha256 { iterations } => (KDF_PBKDF2_SHA256, [iterations, 0, 0]),
        };

        let mut out = [0u8; HEADER_LEN];
        out[..4].copy_from_slice(MAGIC);
        out[4] = VERSION;
        out[5] = kdf_id;
        for (i, value) in params.iter().enumerate() {
            let start = 6 + i * 4;
            out[start..start + 4].copy_from_slice(&value.to_le_bytes());
        }
        out[18..].copy_from_slice(&self.salt);
        out
    }

    fn decode(bytes: &[u8]) -> VaultResult<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(VaultError::bad_key("key envelope truncated"));
        }
        if &bytes[..4] != MAGIC {
            return Err(VaultError::bad_key("not a passvault key envelope"));
        }
        if bytes[4] != VERSION {
            return Err(VaultError::bad_key(format!(
                "unsupported key envelope version {}",
                bytes[4]
            )));
        }

        let param = |i: usize| {
            let start = 6 + i * 4;
            let mut buf = [0u8; 4];
            buf.copy_from_slice(&bytes[start..start + 4]);
            u32::from_le_bytes(buf)
        };
        let kdf = match bytes[5] {
            KDF_ARGON2ID => KdfParams::Argon2id {
                memory_cost: param(0),
                time_cost: param(1),
                parallelism: param(2),
            },
            KDF_PBKDF2_SHA256 => KdfParams::Pbkdf2Sha256 {
                iterations: param(0),
            },
            other => {
                return Err(VaultError::bad_key(format!("unknown kdf id {}", other)));
            }
        };
        // validate() also enforces the cost ceilings
        kdf.validate()
            .map_err(|e| VaultError::bad_key(format!("invalid kdf parameters in envelope: {}", e)))?;

        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(&bytes[18..HEADER_LEN]);

        Ok(Self { kdf, salt })
    }
}

/// Owner of the wrapped data key file
#[derive(Debug, Clone)]
pub struct KeyEnvelope {
    path: PathBuf,
    default_kdf: KdfParams,
}

impl KeyEnvelope {
    /// `default_kdf` is only used if the envelope has to be created
    pub fn new(path: impl Into<PathBuf>, default_kdf: KdfParams) -> Self {
        Self {
            path: path.into(),
            default_kdf,
        }
    }

    /// Path of the envelope file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check whether the envelope file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Return the data key, creating the envelope on first use
    ///
    /// Creation runs once per vault lifetime: a random DEK and salt are
    /// generated, the DEK is wrapped and written, and the DEK is returned.
    /// Afterwards the existing envelope is unwrapped.
    pub fn resolve_key(&self, master_password: &str) -> VaultResult<SecretKey> {
        match read_bytes(&self.path)? {
            Some(bytes) => self.unwrap_bytes(&bytes, master_password),
            None => self.create(master_password),
        }
    }

    /// Return the data key from an existing envelope
    ///
    /// Never creates a file. Fails with [`VaultError::NotFound`] if the
    /// envelope is missing and [`VaultError::BadKeyOrCorruptData`] on a
    /// wrong master password.
    pub fn unwrap_key(&self, master_password: &str) -> VaultResult<SecretKey> {
        let bytes = read_bytes(&self.path)?.ok_or_else(|| self.missing())?;
        self.unwrap_bytes(&bytes, master_password)
    }

    /// Read the header without the password
    pub fn inspect(&self) -> VaultResult<Option<EnvelopeHeader>> {
        read_bytes(&self.path)?
            .map(|bytes| EnvelopeHeader::decode(&bytes))
            .transpose()
    }

    pub(crate) fn missing(&self) -> VaultError {
        VaultError::NotFound(format!("key envelope {}", self.path.display()))
    }

    fn create(&self, master_password: &str) -> VaultResult<SecretKey> {
        let header = EnvelopeHeader {
            kdf: self.default_kdf,
            salt: generate_salt(),
        };
        let header_bytes = header.encode();

        let wrapping_key = derive_key(master_password, &header.salt, &header.kdf)?;
        let dek = SecretKey::generate();
        let wrapped = encrypt_with_aad(dek.as_bytes(), &wrapping_key, &header_bytes)?;

        let mut file = Vec::with_capacity(ENVELOPE_LEN);
        file.extend_from_slice(&header_bytes);
        file.extend_from_slice(&wrapped);
        write_bytes_atomic(&self.path, &file)?;

        tracing::info!(
            path = %self.path.display(),
            kdf = header.kdf.algorithm_name(),
            "created key envelope"
        );
        Ok(dek)
    }

    fn unwrap_bytes(&self, bytes: &[u8], master_password: &str) -> VaultResult<SecretKey> {
        if bytes.len() != ENVELOPE_LEN {
            return Err(VaultError::bad_key(format!(
                "key envelope has {} bytes, expected {}",
                bytes.len(),
                ENVELOPE_LEN
            )));
        }
        let (header_bytes, wrapped) = bytes.split_at(HEADER_LEN);
        let header = EnvelopeHeader::decode(header_bytes)?;

        let wrapping_key = derive_key(master_password, &header.salt, &header.kdf)?;
        let plaintext = Zeroizing::new(decrypt_with_aad(wrapped, &wrapping_key, header_bytes)?);

        if plaintext.len() != KEY_LEN {
            return Err(VaultError::bad_key("wrapped key has wrong length"));
        }
        let mut dek = [0u8; KEY_LEN];
        dek.copy_from_slice(&plaintext);
        let key = SecretKey::from_bytes(dek);
        dek.zeroize();

        tracing::debug!(path = %self.path.display(), "unwrapped data key");
        Ok(key)
    }
}
