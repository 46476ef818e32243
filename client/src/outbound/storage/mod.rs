//! File-backed credential store.
//!
//! The two storage keys live in one small JSON document inside a dedicated
//! directory. Writes go through a staging file that is renamed into place,
//! so a crash mid-write leaves the previous document intact.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use cap_std::{ambient_authority, fs::Dir};
use uuid::Uuid;

use crate::domain::ports::{CredentialStore, CredentialStoreError};

const CREDENTIALS_FILE: &str = "credentials.json";

/// Credential store persisting keys as one JSON document on disk.
#[derive(Debug)]
pub struct JsonFileCredentialStore {
    dir: Dir,
}

impl JsonFileCredentialStore {
    /// Open (creating if needed) the storage directory.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialStoreError::Io`] when the directory cannot be
    /// created or opened.
    pub fn open(path: &Path) -> Result<Self, CredentialStoreError> {
        Dir::create_ambient_dir_all(path, ambient_authority())
            .map_err(|err| CredentialStoreError::io(err.to_string()))?;
        let dir = Dir::open_ambient_dir(path, ambient_authority())
            .map_err(|err| CredentialStoreError::io(err.to_string()))?;
        Ok(Self { dir })
    }

    fn load(&self) -> Result<BTreeMap<String, String>, CredentialStoreError> {
        let bytes = match self.dir.read(CREDENTIALS_FILE) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(CredentialStoreError::io(err.to_string())),
        };
        serde_json::from_slice(&bytes)
            .map_err(|err| CredentialStoreError::serialization(err.to_string()))
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), CredentialStoreError> {
        let encoded = serde_json::to_vec_pretty(entries)
            .map_err(|err| CredentialStoreError::serialization(err.to_string()))?;

        let staging = format!(".tmp-credentials-{}", Uuid::new_v4().simple());
        self.dir
            .write(&staging, &encoded)
            .map_err(|err| CredentialStoreError::io(err.to_string()))?;

        let result = self
            .dir
            .rename(&staging, &self.dir, CREDENTIALS_FILE)
            .map_err(|err| CredentialStoreError::io(err.to_string()));
        if result.is_err() {
            // Renames only fail in degenerate setups; drop the orphan.
            let _cleanup_result = self.dir.remove_file(&staging);
        }
        result
    }
}

impl CredentialStore for JsonFileCredentialStore {
    fn get(&self, key: &str) -> Result<Option<String>, CredentialStoreError> {
        Ok(self.load()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CredentialStoreError> {
        let mut entries = self.load()?;
        entries.insert(key.to_owned(), value.to_owned());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), CredentialStoreError> {
        let mut entries = self.load()?;
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.persist(&entries)
    }
}
