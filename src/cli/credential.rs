//! Credential CLI commands
//!
//! Add, show, list and remove stored credentials. Values not given on the
//! command line are prompted for; the master password is never echoed.
//! `get --copy` puts the password on the clipboard instead of the terminal.

use clap::Subcommand;
use zeroize::Zeroizing;

use crate::error::VaultResult;
use crate::vault::Vault;

use super::clipboard::copy_to_clipboard;
use super::prompt::{prompt_line, prompt_new_secret, prompt_secret};

/// Credential subcommands
#[derive(Subcommand)]
pub enum CredentialCommands {
    /// Add or replace the credentials for a service
    Add {
        /// Service name
        #[arg(short, long)]
        service: Option<String>,
        /// Username for the service
        #[arg(short, long)]
        username: Option<String>,
        /// Password for the service (prompted with confirmation if omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Show the credentials for a service
    Get {
        /// Service name
        #[arg(short, long)]
        service: Option<String>,
        /// Copy the password to the clipboard instead of printing it
        #[arg(short, long)]
        copy: bool,
    },
    /// List all stored services
    #[command(alias = "ls")]
    List,
    /// Delete the credentials for a service
    #[command(alias = "rm")]
    Remove {
        /// Service name
        #[arg(short, long)]
        service: Option<String>,
    },
}

/// Handle a credential command
///
/// `master` is the master password if it was supplied up front.
pub fn handle_credential_command(
    vault: &Vault,
    master: Option<Zeroizing<String>>,
    cmd: CredentialCommands,
) -> VaultResult<()> {
    match cmd {
        CredentialCommands::Add {
            service,
            username,
            password,
        } => {
            let service = arg_or_prompt(service, "Service name")?;
            let username = arg_or_prompt(username, "Username")?;
            let password = match password {
                Some(p) => Zeroizing::new(p),
                None => prompt_new_secret("Password")?,
            };
            let master = master_for_write(vault, master)?;

            vault.save(&service, &username, &password, &master)?;
            println!("Password for {} saved successfully!", service);
        }

        CredentialCommands::Get { service, copy } => {
            let service = arg_or_prompt(service, "Service name")?;
            let master = master_or_prompt(master)?;

            let entry = vault.get(&service, &master)?;
            println!("Username: {}", entry.username);
            if copy {
                copy_to_clipboard(&entry.password)?;
                println!("Password copied to clipboard!");
            } else {
                println!("Password: {}", entry.password);
            }
        }

        CredentialCommands::List => {
            let master = master_or_prompt(master)?;

            let services = vault.list(&master)?;
            if services.is_empty() {
                println!("No services stored yet.");
            } else {
                println!("Stored services:");
                for service in &services {
                    println!("- {}", service);
                }
            }
        }

        CredentialCommands::Remove { service } => {
            let service = arg_or_prompt(service, "Service name")?;
            let master = master_or_prompt(master)?;

            vault.remove(&service, &master)?;
            println!("Password for {} removed.", service);
        }
    }

    Ok(())
}

fn arg_or_prompt(value: Option<String>, label: &str) -> VaultResult<String> {
    match value {
        Some(v) => Ok(v),
        None => prompt_line(label),
    }
}

fn master_or_prompt(master: Option<Zeroizing<String>>) -> VaultResult<Zeroizing<String>> {
    match master {
        Some(m) => Ok(m),
        None => prompt_secret("Master password"),
    }
}

/// A brand-new vault gets its master password confirmed, since a typo
/// would lock the user out for good.
fn master_for_write(vault: &Vault, master: Option<Zeroizing<String>>) -> VaultResult<Zeroizing<String>> {
    match master {
        Some(m) => Ok(m),
        None if !vault.is_initialized() => {
            println!("Creating a new vault. There is no way to recover a forgotten master password.");
            prompt_new_secret("Master password")
        }
        None => prompt_secret("Master password"),
    }
}
