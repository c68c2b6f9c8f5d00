//! AES-256-GCM encryption/decryption
//!
//! Provides authenticated encryption for data at rest using AES-256-GCM.
//! Each encryption operation generates a unique nonce, which is prepended
//! to the ciphertext: `nonce (12 bytes) || ciphertext || tag (16 bytes)`.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::{
    aead::{Aead, KeyInit, OsRng, Payload},
    Aes256Gcm, Nonce,
};
use zeroize::Zeroizing;

use crate::error::{VaultError, VaultResult};

use super::SecretKey;

/// Size of the AES-GCM nonce in bytes (96 bits)
pub const NONCE_SIZE: usize = 12;

/// Size of the AES-GCM authentication tag in bytes
pub const TAG_SIZE: usize = 16;

/// Bytes added to a plaintext by [`encrypt`]
pub const OVERHEAD: usize = NONCE_SIZE + TAG_SIZE;

fn cipher_for(key: &SecretKey) -> VaultResult<Aes256Gcm> {
    Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| VaultError::Encryption(format!("Failed to create cipher: {}", e)))
}

/// Encrypt plaintext, binding `aad` as associated data
pub fn encrypt_with_aad(plaintext: &[u8], key: &SecretKey, aad: &[u8]) -> VaultResult<Vec<u8>> {
    let cipher = cipher_for(key)?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(
            nonce,
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .map_err(|e| VaultError::Encryption(format!("Encryption failed: {}", e)))?;

    let mut out = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    out.extend_from_slice(&nonce_bytes);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Decrypt `nonce || ciphertext`, checking `aad` was bound at encryption
///
/// Fails with [`VaultError::BadKeyOrCorruptData`] on a wrong key, any
/// tampered byte, or a blob too short to hold a nonce and tag.
pub fn decrypt_with_aad(blob: &[u8], key: &SecretKey, aad: &[u8]) -> VaultResult<Vec<u8>> {
    if blob.len() < OVERHEAD {
        return Err(VaultError::bad_key(format!(
            "ciphertext too short: {} bytes",
            blob.len()
        )));
    }

    let cipher = cipher_for(key)?;
    let (nonce_bytes, ciphertext) = blob.split_at(NONCE_SIZE);
    let nonce = Nonce::from_slice(nonce_bytes);

    cipher
        .decrypt(
            nonce,
            Payload {
                msg: ciphertext,
                aad,
            },
        )
        .map_err(|_| VaultError::bad_key("decryption failed: invalid key or corrupted data"))
}

/// Encrypt plaintext data using AES-256-GCM
pub fn encrypt(plaintext: &[u8], key: &SecretKey) -> VaultResult<Vec<u8>> {
    encrypt_with_aad(plaintext, key, &[])
}

/// Decrypt data produced by [`encrypt`]
pub fn decrypt(blob: &[u8], key: &SecretKey) -> VaultResult<Vec<u8>> {
    decrypt_with_aad(blob, key, &[])
}

/// Decrypt to a string, zeroing the intermediate buffer
pub fn decrypt_string(blob: &[u8], key: &SecretKey, aad: &[u8]) -> VaultResult<Zeroizing<String>> {
    let plaintext = decrypt_with_aad(blob, key, aad)?;
    match String::from_utf8(plaintext) {
        Ok(s) => Ok(Zeroizing::new(s)),
        Err(e) => {
            drop(Zeroizing::new(e.into_bytes()));
            Err(VaultError::Json(
                "Invalid UTF-8 in decrypted data".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> SecretKey {
        SecretKey::generate()
    }

    #[test]
    fn test_encrypt_decrypt() {
        let key = test_key();
        let plaintext = b"Hello, World!";

        let encrypted = encrypt(plaintext, &key).unwrap();
        let decrypted = decrypt(&encrypted, &key).unwrap();

        assert_eq!(plaintext, decrypted.as_slice());
        assert_eq!(encrypted.len(), plaintext.len() + OVERHEAD);
    }

    #[test]
    fn test_different_nonces() {
        let key = test_key();
        let plaintext = b"Hello, World!";

        let encrypted1 = encrypt(plaintext, &key).unwrap();
        let encrypted2 = encrypt(plaintext, &key).unwrap();

        assert_ne!(encrypted1[..NONCE_SIZE], encrypted2[..NONCE_SIZE]);
        assert_ne!(encrypted1, encrypted2);
    }

    #[test]
    fn test_wrong_key_fails() {
        let key1 = test_key();
        let key2 = test_key();

        let encrypted = encrypt(b"Hello, World!", &key1).unwrap();

        let result = decrypt(&encrypted, &key2);
        assert!(matches!(result, Err(VaultError::BadKeyOrCorruptData(_))));
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let key = test_key();
        let mut encrypted = encrypt(b"Hello, World!", &key).unwrap();

        encrypted[NONCE_SIZE] ^= 0xFF;

        let result = decrypt(&encrypted, &key);
        assert!(matches!(result, Err(VaultError::BadKeyOrCorruptData(_))));
    }

    #[test]
    fn test_mismatched_aad_fails() {
        let key = test_key();
        let encrypted = encrypt_with_aad(b"payload", &key, b"header-a").unwrap();

        assert!(decrypt_with_aad(&encrypted, &key, b"header-a").is_ok());
        assert!(decrypt_with_aad(&encrypted, &key, b"header-b")
            .unwrap_err()
            .is_bad_key());
    }

    #[test]
    fn test_truncated_blob_fails() {
        let key = test_key();
        let result = decrypt(&[0u8; OVERHEAD - 1], &key);
        assert!(matches!(result, Err(VaultError::BadKeyOrCorruptData(_))));
    }

    #[test]
    fn test_empty_plaintext() {
        let key = test_key();
        let encrypted = encrypt(b"", &key).unwrap();
        let decrypted = decrypt(&encrypted, &key).unwrap();
        assert!(decrypted.is_empty());
    }

    #[test]
    fn test_decrypt_string() {
        let key = test_key();
        let encrypted = encrypt_with_aad("héllo".as_bytes(), &key, b"h").unwrap();
        let decrypted = decrypt_string(&encrypted, &key, b"h").unwrap();
        assert_eq!(decrypted.as_str(), "héllo");
    }

    #[test]
    fn test_decrypt_string_invalid_utf8() {
        let key = test_key();
        let encrypted = encrypt(&[0xFF, 0xFE], &key).unwrap();
        assert!(matches!(
            decrypt_string(&encrypted, &key, &[]),
            Err(VaultError::Json(_))
        ));
    }
}
