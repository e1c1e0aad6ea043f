//! Persistence for the "remember my ID" option.
//!
//! This module provides:
//! - `IdentifierStore`: get/set/clear over a single named slot
//! - `FileIdentifierStore`: JSON file in the user config directory
//! - `KeyringIdentifierStore`: OS-level storage via keyring
//! - `MemoryIdentifierStore`: in-process slot for tests and ephemeral hosts
//!
//! The slot survives restarts but not a wipe of the config directory or
//! keychain. Writes are fire-and-forget from the login flow's point of view.

pub mod file;
pub mod keychain;
pub mod memory;

use thiserror::Error;

pub use file::FileIdentifierStore;
pub use keychain::KeyringIdentifierStore;
pub use memory::MemoryIdentifierStore;

/// Name of the slot holding the remembered ID
pub const SLOT_NAME: &str = "savedMemberId";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access identifier file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse identifier file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Keychain error: {0}")]
    Keyring(#[from] keyring::Error),
}

/// A single durable slot for the remembered ID.
pub trait IdentifierStore {
    fn get(&self) -> Result<Option<String>, StoreError>;

    fn set(&self, identifier: &str) -> Result<(), StoreError>;

    /// Remove the remembered ID. Clearing an empty slot is not an error.
    fn clear(&self) -> Result<(), StoreError>;
}

impl<S: IdentifierStore + ?Sized> IdentifierStore for &S {
    fn get(&self) -> Result<Option<String>, StoreError> {
        (**self).get()
    }

    fn set(&self, identifier: &str) -> Result<(), StoreError> {
        (**self).set(identifier)
    }

    fn clear(&self) -> Result<(), StoreError> {
        (**self).clear()
    }
}

impl<S: IdentifierStore + ?Sized> IdentifierStore for Box<S> {
    fn get(&self) -> Result<Option<String>, StoreError> {
        (**self).get()
    }

    fn set(&self, identifier: &str) -> Result<(), StoreError> {
        (**self).set(identifier)
    }

    fn clear(&self) -> Result<(), StoreError> {
        (**self).clear()
    }
}
