//! Driven port for persisted credential storage.
//!
//! Mirrors the narrow surface of browser local storage: string keys, string
//! values, read once at startup and written only by the session manager.
//! Injecting the store keeps session logic testable without touching disk.

use std::collections::HashMap;
use std::sync::Mutex;

use super::define_port_error;

/// Storage key holding the raw bearer token.
pub const TOKEN_KEY: &str = "token";
/// Storage key holding the serialized reviewer identity.
pub const IDENTITY_KEY: &str = "user";

define_port_error! {
    /// Errors surfaced by credential storage backends.
    pub enum CredentialStoreError {
        /// The backing store could not be read or written.
        Io => "credential store io failed: {message}",
        /// Stored data could not be encoded or decoded.
        Serialization => "credential store serialization failed: {message}",
    }
}

/// Port for the key-value credential store.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialStore: Send + Sync {
    /// Read one value, `None` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, CredentialStoreError>;

    /// Write one value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), CredentialStoreError>;

    /// Delete one value; deleting an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), CredentialStoreError>;
}

/// Volatile in-memory store used by tests and offline demos.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryCredentialStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_entries<T>(
        &self,
        operate: impl FnOnce(&mut HashMap<String, String>) -> T,
    ) -> Result<T, CredentialStoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| CredentialStoreError::io("in-memory store poisoned"))?;
        Ok(operate(&mut entries))
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn get(&self, key: &str) -> Result<Option<String>, CredentialStoreError> {
        self.with_entries(|entries| entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CredentialStoreError> {
        self.with_entries(|entries| {
            entries.insert(key.to_owned(), value.to_owned());
        })
    }

    fn remove(&self, key: &str) -> Result<(), CredentialStoreError> {
        self.with_entries(|entries| {
            entries.remove(key);
        })
    }
}
