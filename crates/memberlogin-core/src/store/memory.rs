use std::sync::{Mutex, MutexGuard};

use super::{IdentifierStore, StoreError};

/// In-process slot. Forgets everything when dropped.
#[derive(Debug, Default)]
pub struct MemoryIdentifierStore {
    slot: Mutex<Option<String>>,
}

impl MemoryIdentifierStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identifier(identifier: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(identifier.into())),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<String>> {
        // The slot holds a plain value, so a poisoned lock is still usable
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl IdentifierStore for MemoryIdentifierStore {
    fn get(&self) -> Result<Option<String>, StoreError> {
        Ok(self.slot().clone())
    }

    fn set(&self, identifier: &str) -> Result<(), StoreError> {
        *self.slot() = Some(identifier.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.slot() = None;
        Ok(())
    }
}
