//! Interactive prompts
//!
//! Secrets are read with echo disabled and held in [`Zeroizing`] buffers
//! that are wiped when dropped.

use std::io::{self, BufRead, Write};

use zeroize::Zeroizing;

use crate::error::{VaultError, VaultResult};

/// Prompt for a visible line of input, re-asking until it is non-empty
pub fn prompt_line(label: &str) -> VaultResult<String> {
    let stdin = io::stdin();
    loop {
        print!("{}: ", label);
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Err(VaultError::Validation(format!("No {} given", label)));
        }

        let value = line.trim();
        if !value.is_empty() {
            return Ok(value.to_string());
        }
    }
}

/// Prompt for a secret (hidden input)
pub fn prompt_secret(label: &str) -> VaultResult<Zeroizing<String>> {
    rpassword::prompt_password(format!("{}: ", label))
        .map(Zeroizing::new)
        .map_err(|e| VaultError::Io(format!("Failed to read {}: {}", label, e)))
}

/// Prompt for a new secret with confirmation
pub fn prompt_new_secret(label: &str) -> VaultResult<Zeroizing<String>> {
    loop {
        let first = prompt_secret(label)?;

        if first.is_empty() {
            println!("{} cannot be empty. Please try again.", label);
            continue;
        }

        let second = prompt_secret(&format!("Repeat {}", label.to_lowercase()))?;

        if *first != *second {
            println!("Entries do not match. Please try again.");
            continue;
        }

        return Ok(first);
    }
}
