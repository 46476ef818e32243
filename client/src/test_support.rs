//! Test utilities exposed behind the `test-support` feature.
//!
//! Integration tests cannot see the `cfg(test)` mockall doubles, so this
//! module provides the hand-rolled equivalents they need: a section
//! builder, a temp-dir-backed credential store, and a recording gateway
//! that counts outbound writes and injects per-kind failures.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{
    FixtureManualGateway, ManualGateway, ManualGatewayError, NewEntry, ReportDocument,
    SectionPatch,
};
use crate::domain::{
    AccessToken, EntryId, EntryKind, ManualSection, SectionEntries, SectionId, UserId,
};
use crate::outbound::JsonFileCredentialStore;

/// Build a bare section with the given identifier and heading.
///
/// # Panics
///
/// Panics when `id` fails section-id validation; test fixtures pass
/// literals.
#[must_use]
pub fn sample_section(id: &str, code: &str, part: &str, title: &str) -> ManualSection {
    ManualSection {
        id: SectionId::new(id).unwrap_or_else(|err| panic!("fixture section id: {err}")),
        code: code.to_owned(),
        title: title.to_owned(),
        part: part.to_owned(),
        content: format!("Draft provision for {code}."),
        entries: SectionEntries::default(),
    }
}

/// Open a [`JsonFileCredentialStore`] inside a fresh temp directory.
///
/// The [`tempfile::TempDir`] guard must outlive the store.
///
/// # Panics
///
/// Panics when the temp directory or store cannot be created.
#[must_use]
pub fn temp_credential_store() -> (tempfile::TempDir, JsonFileCredentialStore) {
    let dir = tempfile::tempdir().unwrap_or_else(|err| panic!("temp dir: {err}"));
    let store = JsonFileCredentialStore::open(dir.path())
        .unwrap_or_else(|err| panic!("credential store: {err}"));
    (dir, store)
}

/// Gateway double recording every create-entry payload it sees.
///
/// Reads and writes delegate to an inner [`FixtureManualGateway`]; entry
/// kinds registered through [`RecordingManualGateway::fail_kind`] are
/// rejected instead, after recording, to exercise partial-failure paths.
#[derive(Debug)]
pub struct RecordingManualGateway {
    inner: FixtureManualGateway,
    recorded: Mutex<Vec<NewEntry>>,
    failing_kinds: Mutex<HashSet<EntryKind>>,
}

impl RecordingManualGateway {
    /// Seed the inner fixture with sections.
    #[must_use]
    pub fn seeded(sections: Vec<ManualSection>) -> Self {
        Self {
            inner: FixtureManualGateway::seeded(sections),
            recorded: Mutex::new(Vec::new()),
            failing_kinds: Mutex::new(HashSet::new()),
        }
    }

    /// Reject future writes of this kind.
    ///
    /// # Panics
    ///
    /// Panics when the internal lock is poisoned.
    pub fn fail_kind(&self, kind: EntryKind) {
        self.failing_kinds
            .lock()
            .unwrap_or_else(|err| panic!("failing-kinds lock: {err}"))
            .insert(kind);
    }

    /// Every create-entry payload seen so far, in arrival order.
    ///
    /// # Panics
    ///
    /// Panics when the internal lock is poisoned.
    #[must_use]
    pub fn recorded_entries(&self) -> Vec<NewEntry> {
        self.recorded
            .lock()
            .unwrap_or_else(|err| panic!("recorded lock: {err}"))
            .clone()
    }

    fn should_fail(&self, kind: EntryKind) -> bool {
        self.failing_kinds
            .lock()
            .unwrap_or_else(|err| panic!("failing-kinds lock: {err}"))
            .contains(&kind)
    }
}

#[async_trait]
impl ManualGateway for RecordingManualGateway {
    async fn fetch_sections(
        &self,
        token: &AccessToken,
    ) -> Result<Vec<ManualSection>, ManualGatewayError> {
        self.inner.fetch_sections(token).await
    }

    async fn fetch_sections_admin(
        &self,
        token: &AccessToken,
    ) -> Result<Vec<ManualSection>, ManualGatewayError> {
        self.inner.fetch_sections_admin(token).await
    }

    async fn create_entry(
        &self,
        token: &AccessToken,
        entry: &NewEntry,
    ) -> Result<ManualSection, ManualGatewayError> {
        self.recorded
            .lock()
            .unwrap_or_else(|err| panic!("recorded lock: {err}"))
            .push(entry.clone());
        if self.should_fail(entry.kind) {
            return Err(ManualGatewayError::rejected("injected write failure"));
        }
        self.inner.create_entry(token, entry).await
    }

    async fn update_section(
        &self,
        token: &AccessToken,
        section: &SectionId,
        patch: &SectionPatch,
    ) -> Result<ManualSection, ManualGatewayError> {
        self.inner.update_section(token, section, patch).await
    }

    async fn delete_section(
        &self,
        token: &AccessToken,
        section: &SectionId,
    ) -> Result<(), ManualGatewayError> {
        self.inner.delete_section(token, section).await
    }

    async fn delete_entry(
        &self,
        token: &AccessToken,
        section: &SectionId,
        kind: EntryKind,
        entry: &EntryId,
    ) -> Result<ManualSection, ManualGatewayError> {
        self.inner.delete_entry(token, section, kind, entry).await
    }

    async fn download_report(
        &self,
        token: &AccessToken,
        for_user: Option<UserId>,
    ) -> Result<ReportDocument, ManualGatewayError> {
        self.inner.download_report(token, for_user).await
    }
}
