//! Core data models for passvault
//!
//! Credential records and the service → credential mapping that is
//! encrypted as a single document.

pub mod credential;

pub use credential::{Credential, CredentialStore};
