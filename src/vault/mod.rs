//! Vault core: envelope-encrypted credential storage
//!
//! [`Vault`] is the interface callers use. Each operation takes the master
//! password, derives the wrapping key, resolves the data key through the
//! [`KeyEnvelope`], and reads or rewrites the [`RecordStore`]. Keys live
//! only for the duration of one call and are zeroed on drop.

pub mod key_envelope;
pub mod record_store;

pub use key_envelope::{EnvelopeHeader, KeyEnvelope};
pub use record_store::RecordStore;

use crate::config::VaultConfig;
use crate::error::{VaultError, VaultResult};
use crate::models::{Credential, CredentialStore};
use crate::storage::VaultLock;

/// A password vault on disk
#[derive(Debug, Clone)]
pub struct Vault {
    config: VaultConfig,
    envelope: KeyEnvelope,
    records: RecordStore,
}

impl Vault {
    /// Open a vault described by `config`
    ///
    /// Touches no files; the vault is created lazily by the first save.
    pub fn new(config: VaultConfig) -> Self {
        Self {
            envelope: KeyEnvelope::new(config.key_file.clone(), config.kdf),
            records: RecordStore::new(config.data_file.clone()),
            config,
        }
    }

    /// The configuration this vault was opened with
    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// The key envelope
    pub fn envelope(&self) -> &KeyEnvelope {
        &self.envelope
    }

    /// Check whether the vault has been created (key envelope exists)
    pub fn is_initialized(&self) -> bool {
        self.envelope.exists()
    }

    /// Store credentials for a service, replacing any existing record
    ///
    /// Creates the key envelope on first use. The whole store is
    /// re-encrypted and atomically rewritten.
    pub fn save(
        &self,
        service: &str,
        username: &str,
        password: &str,
        master_password: &str,
    ) -> VaultResult<()> {
        if service.trim().is_empty() {
            return Err(VaultError::Validation(
                "Service name cannot be empty".to_string(),
            ));
        }

        let _lock = VaultLock::acquire(&self.config.lock_file)?;

        // A fresh envelope would hold a new DEK that can't read the store
        if self.records.exists() && !self.envelope.exists() {
            return Err(self.envelope.missing());
        }

        let key = self.envelope.resolve_key(master_password)?;
        let mut store = self.records.load(&key)?.unwrap_or_default();

        let replaced = store.upsert(service, Credential::new(username, password));
        self.records.save_all(&store, &key)?;

        tracing::debug!(replaced, "saved credential");
        Ok(())
    }

    /// Look up the credentials for a service
    pub fn get(&self, service: &str, master_password: &str) -> VaultResult<Credential> {
        let store = self.load_existing(master_password)?;
        store
            .get(service)
            .cloned()
            .ok_or_else(|| VaultError::no_such_service(service))
    }

    /// List stored service names in sorted order
    ///
    /// An empty vault yields an empty list, not an error.
    pub fn list(&self, master_password: &str) -> VaultResult<Vec<String>> {
        if !self.records.exists() {
            return Ok(Vec::new());
        }
        let store = self.load_existing(master_password)?;
        Ok(store.services())
    }

    /// Delete the credentials for a service
    pub fn remove(&self, service: &str, master_password: &str) -> VaultResult<()> {
        let _lock = VaultLock::acquire(&self.config.lock_file)?;

        if !self.records.exists() {
            return Err(self.no_store());
        }
        let key = self.envelope.unwrap_key(master_password)?;
        let mut store = self.records.load(&key)?.ok_or_else(|| self.no_store())?;

        if store.remove(service).is_none() {
            return Err(VaultError::no_such_service(service));
        }
        self.records.save_all(&store, &key)?;

        tracing::debug!("removed credential");
        Ok(())
    }

    fn load_existing(&self, master_password: &str) -> VaultResult<CredentialStore> {
        if !self.records.exists() {
            return Err(self.no_store());
        }
        let key = self.envelope.unwrap_key(master_password)?;
        self.records.load(&key)?.ok_or_else(|| self.no_store())
    }

    fn no_store(&self) -> VaultError {
        VaultError::NotFound("no passwords stored yet".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::key_derivation::test_params;
    use crate::crypto::KdfParams;
    use crate::vault::key_envelope::ENVELOPE_LEN;
    use tempfile::TempDir;

    fn test_vault(dir: &TempDir) -> Vault {
        Vault::new(VaultConfig::in_dir(dir.path(), test_params()))
    }

    #[test]
    fn test_save_get_list_scenario() {
        let temp_dir = TempDir::new().unwrap();
        let vault = test_vault(&temp_dir);

        vault.save("github", "alice", "p@ss1", "hunter2").unwrap();

        let cred = vault.get("github", "hunter2").unwrap();
        assert_eq!(cred, Credential::new("alice", "p@ss1"));
        assert_eq!(vault.list("hunter2").unwrap(), vec!["github"]);

        let err = vault.get("github", "wrong").unwrap_err();
        assert!(err.is_bad_key());
    }

    #[test]
    fn test_first_save_creates_both_files() {
        let temp_dir = TempDir::new().unwrap();
        let vault = test_vault(&temp_dir);
        assert!(!vault.is_initialized());

        vault.save("github", "alice", "p@ss1", "hunter2").unwrap();

        assert!(vault.is_initialized());
        assert!(vault.config().data_file.exists());
        assert!(!vault.config().lock_file.exists());
        assert_eq!(
            std::fs::read(&vault.config().key_file).unwrap().len(),
            ENVELOPE_LEN
        );
    }

    #[test]
    fn test_isolation_between_services() {
        let temp_dir = TempDir::new().unwrap();
        let vault = test_vault(&temp_dir);

        vault.save("github", "alice", "p@ss1", "hunter2").unwrap();
        vault.save("gitlab", "bob", "s3cret", "hunter2").unwrap();

        assert_eq!(
            vault.get("github", "hunter2").unwrap(),
            Credential::new("alice", "p@ss1")
        );
        assert_eq!(
            vault.get("gitlab", "hunter2").unwrap(),
            Credential::new("bob", "s3cret")
        );
    }

    #[test]
    fn test_overwrite_keeps_latest() {
        let temp_dir = TempDir::new().unwrap();
        let vault = test_vault(&temp_dir);

        vault.save("github", "alice", "old", "hunter2").unwrap();
        vault.save("github", "alice2", "new", "hunter2").unwrap();

        assert_eq!(
            vault.get("github", "hunter2").unwrap(),
            Credential::new("alice2", "new")
        );
        assert_eq!(vault.list("hunter2").unwrap().len(), 1);
    }

    #[test]
    fn test_list_empty_vault() {
        let temp_dir = TempDir::new().unwrap();
        let vault = test_vault(&temp_dir);

        assert!(vault.list("hunter2").unwrap().is_empty());
        assert!(!vault.is_initialized());
    }

    #[test]
    fn test_get_empty_vault_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let vault = test_vault(&temp_dir);

        let err = vault.get("github", "hunter2").unwrap_err();
        assert!(err.is_not_found());
        assert!(!vault.is_initialized());
    }

    #[test]
    fn test_get_unknown_service() {
        let temp_dir = TempDir::new().unwrap();
        let vault = test_vault(&temp_dir);
        vault.save("github", "alice", "p@ss1", "hunter2").unwrap();

        let err = vault.get("gitlab", "hunter2").unwrap_err();
        assert!(matches!(err, VaultError::NoSuchService(ref s) if s == "gitlab"));
    }

    #[test]
    fn test_wrong_password_list_and_save() {
        let temp_dir = TempDir::new().unwrap();
        let vault = test_vault(&temp_dir);
        vault.save("github", "alice", "p@ss1", "hunter2").unwrap();

        assert!(vault.list("wrong").unwrap_err().is_bad_key());
        assert!(vault
            .save("gitlab", "bob", "x", "wrong")
            .unwrap_err()
            .is_bad_key());

        // Failed save left the store untouched
        assert_eq!(vault.list("hunter2").unwrap(), vec!["github"]);
    }

    #[test]
    fn test_reopen_with_different_default_kdf() {
        let temp_dir = TempDir::new().unwrap();
        test_vault(&temp_dir)
            .save("github", "alice", "p@ss1", "hunter2")
            .unwrap();

        // Existing vaults use the parameters in their envelope header
        let reopened = Vault::new(VaultConfig::in_dir(temp_dir.path(), KdfParams::pbkdf2()));
        assert_eq!(
            reopened.get("github", "hunter2").unwrap().username,
            "alice"
        );
    }

    #[test]
    fn test_missing_envelope_is_not_rekeyed() {
        let temp_dir = TempDir::new().unwrap();
        let vault = test_vault(&temp_dir);
        vault.save("github", "alice", "p@ss1", "hunter2").unwrap();
        std::fs::remove_file(&vault.config().key_file).unwrap();

        assert!(vault.get("github", "hunter2").unwrap_err().is_not_found());
        assert!(vault
            .save("gitlab", "bob", "x", "hunter2")
            .unwrap_err()
            .is_not_found());
        assert!(!vault.is_initialized());
    }

    #[test]
    fn test_empty_service_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let vault = test_vault(&temp_dir);

        let err = vault.save("  ", "alice", "p@ss1", "hunter2").unwrap_err();
        assert!(matches!(err, VaultError::Validation(_)));
        assert!(!vault.is_initialized());
    }

    #[test]
    fn test_save_blocked_by_lock() {
        let temp_dir = TempDir::new().unwrap();
        let vault = test_vault(&temp_dir);
        let _held = VaultLock::acquire(&vault.config().lock_file).unwrap();

        let err = vault.save("github", "alice", "p@ss1", "hunter2").unwrap_err();
        assert!(matches!(err, VaultError::Locked(_)));
    }

    #[test]
    fn test_remove() {
        let temp_dir = TempDir::new().unwrap();
        let vault = test_vault(&temp_dir);
        vault.save("github", "alice", "p@ss1", "hunter2").unwrap();
        vault.save("gitlab", "bob", "s3cret", "hunter2").unwrap();

        vault.remove("github", "hunter2").unwrap();

        assert_eq!(vault.list("hunter2").unwrap(), vec!["gitlab"]);
        assert!(matches!(
            vault.remove("github", "hunter2"),
            Err(VaultError::NoSuchService(_))
        ));
    }

    #[test]
    fn test_remove_wrong_password_keeps_record() {
        let temp_dir = TempDir::new().unwrap();
        let vault = test_vault(&temp_dir);
        vault.save("github", "alice", "p@ss1", "hunter2").unwrap();
        let before = std::fs::read(&vault.config().data_file).unwrap();

        let err = vault.remove("github", "wrong").unwrap_err();
        assert!(err.is_bad_key());

        assert_eq!(std::fs::read(&vault.config().data_file).unwrap(), before);
        assert!(!vault.config().lock_file.exists());
        assert_eq!(vault.list("hunter2").unwrap(), vec!["github"]);
    }

    #[test]
    fn test_remove_blocked_by_lock() {
        let temp_dir = TempDir::new().unwrap();
        let vault = test_vault(&temp_dir);
        vault.save("github", "alice", "p@ss1", "hunter2").unwrap();

        {
            let _held = VaultLock::acquire(&vault.config().lock_file).unwrap();
            let err = vault.remove("github", "hunter2").unwrap_err();
            assert!(matches!(err, VaultError::Locked(_)));
        }

        // Still there once the other writer lets go
        assert_eq!(vault.list("hunter2").unwrap(), vec!["github"]);
        vault.remove("github", "hunter2").unwrap();
        assert!(vault.list("hunter2").unwrap().is_empty());
    }

    #[test]
    fn test_remove_empty_vault_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let vault = test_vault(&temp_dir);

        assert!(vault.remove("github", "hunter2").unwrap_err().is_not_found());
    }

    #[test]
    fn test_unicode_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let vault = test_vault(&temp_dir);

        vault
            .save("bänk \"prod\"", "ユーザー", "pa$$\nword\u{1F511}", "mäster")
            .unwrap();

        let cred = vault.get("bänk \"prod\"", "mäster").unwrap();
        assert_eq!(cred.username, "ユーザー");
        assert_eq!(cred.password, "pa$$\nword\u{1F511}");
    }
}
