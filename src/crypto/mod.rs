//! Cryptographic primitives for passvault
//!
//! Key derivation (Argon2id or PBKDF2-HMAC-SHA256) turns the master
//! password into a wrapping key; AES-256-GCM encrypts both the wrapped
//! data key and the record store.

pub mod encryption;
pub mod key_derivation;

pub use encryption::{decrypt, decrypt_string, decrypt_with_aad, encrypt, encrypt_with_aad};
pub use key_derivation::{derive_key, generate_salt, KdfParams, SecretKey, KEY_LEN, SALT_LEN};
