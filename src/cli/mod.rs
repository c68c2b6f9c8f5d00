//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the vault core.

pub mod clipboard;
pub mod credential;
pub mod info;
pub mod prompt;

pub use credential::{handle_credential_command, CredentialCommands};
pub use info::handle_info_command;
