//! passvault - local password vault with envelope encryption
//!
//! A master password is stretched into a wrapping key, which protects a
//! random data key, which encrypts the credential store. The library holds
//! the vault core; the `passvault` binary is a thin CLI on top of it.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: vault paths, settings, and the explicit [`VaultConfig`]
//! - `crypto`: key derivation, AES-256-GCM, zeroizing secret types
//! - `error`: custom error types
//! - `models`: credential records and the credential map
//! - `storage`: atomic file writes and the writer lock
//! - `vault`: key envelope, record store, and the [`Vault`] facade
//! - `cli`: command handlers for the binary
//!
//! # Example
//!
//! ```rust,ignore
//! use passvault::config::{Settings, VaultConfig, VaultPaths};
//! use passvault::Vault;
//!
//! let paths = VaultPaths::new()?;
//! let settings = Settings::load_or_default(&paths)?;
//! let vault = Vault::new(VaultConfig::new(&paths, &settings));
//!
//! vault.save("github", "alice", "p@ss1", "hunter2")?;
//! let cred = vault.get("github", "hunter2")?;
//! ```

pub mod cli;
pub mod config;
pub mod crypto;
pub mod error;
pub mod models;
pub mod storage;
pub mod vault;

pub use config::VaultConfig;
pub use error::{VaultError, VaultResult};
pub use models::{Credential, CredentialStore};
pub use vault::Vault;
