use keyring::Entry;

use crate::config::APP_NAME;

use super::{IdentifierStore, StoreError, SLOT_NAME};

/// Remembered ID kept in the OS keychain.
///
/// Backed by the macOS keychain, the Windows credential manager, or the Linux
/// kernel keyring, which keeps the entry across process restarts.
pub struct KeyringIdentifierStore {
    service: String,
}

impl Default for KeyringIdentifierStore {
    fn default() -> Self {
        Self::new(APP_NAME)
    }
}

impl KeyringIdentifierStore {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self) -> Result<Entry, StoreError> {
        Ok(Entry::new(&self.service, SLOT_NAME)?)
    }
}

/// A missing entry reads as nothing remembered
fn read_result(result: keyring::Result<String>) -> Result<Option<String>, StoreError> {
    match result {
        Ok(identifier) => Ok(Some(identifier).filter(|id| !id.is_empty())),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Deleting a missing entry is not an error
fn delete_result(result: keyring::Result<()>) -> Result<(), StoreError> {
    match result {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

impl IdentifierStore for KeyringIdentifierStore {
    fn get(&self) -> Result<Option<String>, StoreError> {
        read_result(self.entry()?.get_password())
    }

    fn set(&self, identifier: &str) -> Result<(), StoreError> {
        self.entry()?.set_password(identifier)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        delete_result(self.entry()?.delete_credential())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_entry_reads_as_none() {
        assert_eq!(read_result(Err(keyring::Error::NoEntry)).unwrap(), None);
        assert_eq!(read_result(Ok(String::new())).unwrap(), None);
        assert_eq!(
            read_result(Ok("alice".to_string())).unwrap(),
            Some("alice".to_string())
        );
    }

    #[test]
    fn test_clearing_missing_entry_is_noop() {
        assert!(delete_result(Err(keyring::Error::NoEntry)).is_ok());
        assert!(delete_result(Ok(())).is_ok());
    }

    #[test]
    fn test_platform_errors_propagate() {
        let denied = || keyring::Error::NoStorageAccess(std::io::Error::other("locked").into());
        assert!(matches!(read_result(Err(denied())), Err(StoreError::Keyring(_))));
        assert!(matches!(delete_result(Err(denied())), Err(StoreError::Keyring(_))));
    }

    /// Service name unique to this test run so parallel runs do not collide
    fn test_store() -> KeyringIdentifierStore {
        KeyringIdentifierStore::new(format!("{}-test-{}", APP_NAME, std::process::id()))
    }

    #[test]
    fn test_round_trip_across_instances() {
        let store = test_store();
        // Sandboxes without a reachable keychain refuse the first write
        if let Err(e) = store.set("alice") {
            eprintln!("skipping keychain round trip: {}", e);
            return;
        }

        // A fresh instance opens a fresh entry handle, as on the next start
        assert_eq!(test_store().get().unwrap(), Some("alice".to_string()));

        test_store().clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
        // Clearing again is still fine
        store.clear().unwrap();
    }
}
