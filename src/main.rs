use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

use passvault::cli::{handle_credential_command, handle_info_command, CredentialCommands};
use passvault::config::{paths::VAULT_DIR_ENV, Settings, VaultConfig, VaultPaths};
use passvault::Vault;

#[derive(Parser)]
#[command(
    name = "passvault",
    version,
    about = "Local password vault with envelope encryption",
    long_about = "passvault stores per-service usernames and passwords in an encrypted \
                  file. A master password unlocks a random data key, which in turn \
                  encrypts the credential store."
)]
struct Cli {
    /// Vault directory (defaults to ~/.config/passvault)
    #[arg(long, global = true, env = VAULT_DIR_ENV)]
    vault_dir: Option<PathBuf>,

    /// Master password (prompted if omitted)
    #[arg(long, global = true, env = "PASSVAULT_MASTER_PASSWORD", hide_env_values = true)]
    master_password: Option<String>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Credential(CredentialCommands),

    /// Show vault location and key derivation settings
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let paths = match cli.vault_dir {
        Some(dir) => VaultPaths::with_base_dir(dir),
        None => VaultPaths::new()?,
    };
    let settings = Settings::load_or_default(&paths)?;
    let vault = Vault::new(VaultConfig::new(&paths, &settings));

    match cli.command {
        Commands::Credential(cmd) => {
            let master = cli.master_password.map(Zeroizing::new);
            handle_credential_command(&vault, master, cmd)?;
        }
        Commands::Info => handle_info_command(&paths, &vault)?,
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` overrides the default level.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("passvault={default_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
