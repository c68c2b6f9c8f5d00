//! Vault info command
//!
//! Shows where the vault lives and how its key is derived. Reads only the
//! public envelope header, so no password is needed.

use crate::config::VaultPaths;
use crate::crypto::KdfParams;
use crate::error::VaultResult;
use crate::vault::Vault;

/// Print vault paths and key derivation parameters
pub fn handle_info_command(paths: &VaultPaths, vault: &Vault) -> VaultResult<()> {
    println!("passvault");
    println!("=========");
    println!("Vault directory: {}", paths.base_dir().display());
    println!("Key file:        {}", vault.config().key_file.display());
    println!("Data file:       {}", vault.config().data_file.display());
    println!();

    match vault.envelope().inspect()? {
        Some(header) => {
            println!("Status: INITIALIZED");
            println!();
            print_kdf("Key Derivation Parameters:", &header.kdf);
        }
        None => {
            println!("Status: NOT INITIALIZED");
            println!("The vault is created by the first 'passvault add'.");
            println!();
            print_kdf("Key Derivation Parameters (for new vault):", &vault.config().kdf);
        }
    }

    Ok(())
}

fn print_kdf(title: &str, kdf: &KdfParams) {
    println!("{}", title);
    println!("  Algorithm: {}", kdf.algorithm_name());
    match *kdf {
        KdfParams::Argon2id {
            memory_cost,
            time_cost,
            parallelism,
        } => {
            println!("  Memory Cost: {} KiB", memory_cost);
            println!("  Time Cost: {} iterations", time_cost);
            println!("  Parallelism: {} threads", parallelism);
        }
        KdfParams::Pbkdf2Sha256 { iterations } => {
            println!("  Iterations: {}", iterations);
        }
    }
}
