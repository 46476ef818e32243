//! Driven port for the manual review service.
//!
//! The domain owns the request and response shapes so the registry cache and
//! submission workflow stay adapter-agnostic; the HTTP adapter translates
//! these into the service's JSON routes.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::auth::AccessToken;
use crate::domain::manual::{
    Entry, EntryAuthor, EntryId, EntryKind, ManualSection, SectionId,
};
use crate::domain::user::UserId;

use super::define_port_error;

/// Payload for one create-entry write.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    /// Section the entry belongs to.
    pub section_id: SectionId,
    /// Reviewer submitting the entry.
    pub author_id: UserId,
    /// Which collection the entry lands in.
    pub kind: EntryKind,
    /// Entry text.
    pub content: String,
}

/// Partial section-metadata update (administrator edit).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SectionPatch {
    /// Replacement citation code.
    pub code: Option<String>,
    /// Replacement heading.
    pub title: Option<String>,
    /// Replacement manual part.
    pub part: Option<String>,
    /// Replacement provision text.
    pub content: Option<String>,
}

impl SectionPatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.code.is_none() && self.title.is_none() && self.part.is_none() && self.content.is_none()
    }
}

/// Binary report returned by the download endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDocument {
    /// Raw PDF bytes.
    pub bytes: Vec<u8>,
}

define_port_error! {
    /// Errors surfaced while calling the manual review service.
    pub enum ManualGatewayError {
        /// The bearer token was missing, expired, or insufficient.
        Unauthorized => "manual service refused the credential: {message}",
        /// The service rejected the operation; carries the service's own
        /// wording when it supplied any.
        Rejected => "manual service rejected the request: {message}",
        /// Network transport failed before a response arrived.
        Transport => "manual service transport failed: {message}",
        /// The call exceeded its timeout.
        Timeout => "manual service timed out: {message}",
        /// The response body could not be decoded.
        Decode => "manual service response decode failed: {message}",
    }
}

/// Port for reading and writing manual sections.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ManualGateway: Send + Sync {
    /// Fetch all sections in the standard reviewer view.
    async fn fetch_sections(
        &self,
        token: &AccessToken,
    ) -> Result<Vec<ManualSection>, ManualGatewayError>;

    /// Fetch all sections in the administrator view (entries carry full
    /// author identities).
    async fn fetch_sections_admin(
        &self,
        token: &AccessToken,
    ) -> Result<Vec<ManualSection>, ManualGatewayError>;

    /// Append one feedback entry; the reply is the full updated section.
    async fn create_entry(
        &self,
        token: &AccessToken,
        entry: &NewEntry,
    ) -> Result<ManualSection, ManualGatewayError>;

    /// Update section metadata; the reply is the full updated section.
    async fn update_section(
        &self,
        token: &AccessToken,
        section: &SectionId,
        patch: &SectionPatch,
    ) -> Result<ManualSection, ManualGatewayError>;

    /// Strike a section from the registry.
    async fn delete_section(
        &self,
        token: &AccessToken,
        section: &SectionId,
    ) -> Result<(), ManualGatewayError>;

    /// Remove one entry; the reply is the full updated section.
    async fn delete_entry(
        &self,
        token: &AccessToken,
        section: &SectionId,
        kind: EntryKind,
        entry: &EntryId,
    ) -> Result<ManualSection, ManualGatewayError>;

    /// Download the aggregate PDF report, optionally scoped to one reviewer.
    async fn download_report(
        &self,
        token: &AccessToken,
        for_user: Option<UserId>,
    ) -> Result<ReportDocument, ManualGatewayError>;
}

/// In-memory gateway that behaves like the service: writes return the full
/// updated section.
///
/// Used by tests and offline demos. State is seeded at construction; entry
/// ids are assigned from a counter so delete-by-id round trips work.
#[derive(Debug, Default)]
pub struct FixtureManualGateway {
    state: Mutex<FixtureState>,
}

#[derive(Debug, Default)]
struct FixtureState {
    sections: Vec<ManualSection>,
    next_entry_id: u64,
}

impl FixtureManualGateway {
    /// Seed the fixture with an initial set of sections.
    #[must_use]
    pub fn seeded(sections: Vec<ManualSection>) -> Self {
        Self {
            state: Mutex::new(FixtureState {
                sections,
                next_entry_id: 1,
            }),
        }
    }

    fn with_state<T>(
        &self,
        operate: impl FnOnce(&mut FixtureState) -> Result<T, ManualGatewayError>,
    ) -> Result<T, ManualGatewayError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| ManualGatewayError::transport("fixture state poisoned"))?;
        operate(&mut state)
    }
}

fn find_section<'a>(
    state: &'a mut FixtureState,
    section: &SectionId,
) -> Result<&'a mut ManualSection, ManualGatewayError> {
    state
        .sections
        .iter_mut()
        .find(|candidate| candidate.id == *section)
        .ok_or_else(|| ManualGatewayError::rejected("Section not found"))
}

#[async_trait]
impl ManualGateway for FixtureManualGateway {
    async fn fetch_sections(
        &self,
        _token: &AccessToken,
    ) -> Result<Vec<ManualSection>, ManualGatewayError> {
        self.with_state(|state| Ok(state.sections.clone()))
    }

    async fn fetch_sections_admin(
        &self,
        token: &AccessToken,
    ) -> Result<Vec<ManualSection>, ManualGatewayError> {
        self.fetch_sections(token).await
    }

    async fn create_entry(
        &self,
        _token: &AccessToken,
        entry: &NewEntry,
    ) -> Result<ManualSection, ManualGatewayError> {
        self.with_state(|state| {
            let id = EntryId::new(format!("entry-{}", state.next_entry_id))
                .map_err(|err| ManualGatewayError::decode(err.to_string()))?;
            state.next_entry_id += 1;
            let section = find_section(state, &entry.section_id)?;
            section.entries.of_mut(entry.kind).push(Entry {
                id: Some(id),
                author: EntryAuthor::Reference(entry.author_id.clone()),
                created_at: Utc::now(),
                text: entry.content.clone(),
            });
            Ok(section.clone())
        })
    }

    async fn update_section(
        &self,
        _token: &AccessToken,
        section: &SectionId,
        patch: &SectionPatch,
    ) -> Result<ManualSection, ManualGatewayError> {
        self.with_state(|state| {
            let found = find_section(state, section)?;
            if let Some(code) = &patch.code {
                found.code.clone_from(code);
            }
            if let Some(title) = &patch.title {
                found.title.clone_from(title);
            }
            if let Some(part) = &patch.part {
                found.part.clone_from(part);
            }
            if let Some(content) = &patch.content {
                found.content.clone_from(content);
            }
            Ok(found.clone())
        })
    }

    async fn delete_section(
        &self,
        _token: &AccessToken,
        section: &SectionId,
    ) -> Result<(), ManualGatewayError> {
        self.with_state(|state| {
            let before = state.sections.len();
            state.sections.retain(|candidate| candidate.id != *section);
            if state.sections.len() == before {
                return Err(ManualGatewayError::rejected("Section not found"));
            }
            Ok(())
        })
    }

    async fn delete_entry(
        &self,
        _token: &AccessToken,
        section: &SectionId,
        kind: EntryKind,
        entry: &EntryId,
    ) -> Result<ManualSection, ManualGatewayError> {
        self.with_state(|state| {
            let found = find_section(state, section)?;
            let collection = found.entries.of_mut(kind);
            let before = collection.len();
            collection.retain(|candidate| candidate.id.as_ref() != Some(entry));
            if collection.len() == before {
                return Err(ManualGatewayError::rejected("Entry not found"));
            }
            Ok(found.clone())
        })
    }

    async fn download_report(
        &self,
        _token: &AccessToken,
        _for_user: Option<UserId>,
    ) -> Result<ReportDocument, ManualGatewayError> {
        Ok(ReportDocument {
            bytes: b"%PDF-1.4 fixture report".to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::manual::SectionEntries;
    use rstest::rstest;

    fn token() -> AccessToken {
        AccessToken::new("fixture").expect("valid token")
    }

    fn section(id: &str) -> ManualSection {
        ManualSection {
            id: SectionId::new(id).expect("valid id"),
            code: "1.1".to_owned(),
            title: "Pre-trial directions".to_owned(),
            part: "PART I".to_owned(),
            content: "The court may issue directions.".to_owned(),
            entries: SectionEntries::default(),
        }
    }

    fn new_entry(section: &str, kind: EntryKind) -> NewEntry {
        NewEntry {
            section_id: SectionId::new(section).expect("valid id"),
            author_id: UserId::new("64a1").expect("valid id"),
            kind,
            content: "text".to_owned(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn create_entry_returns_the_updated_section() {
        let gateway = FixtureManualGateway::seeded(vec![section("s1")]);
        let updated = gateway
            .create_entry(&token(), &new_entry("s1", EntryKind::Reference))
            .await
            .expect("create should succeed");
        assert_eq!(updated.entry_count(EntryKind::Reference), 1);
        assert!(
            updated.entries.of(EntryKind::Reference)[0].id.is_some(),
            "fixture should assign entry ids"
        );
    }

    #[rstest]
    #[tokio::test]
    async fn create_entry_against_unknown_section_is_rejected() {
        let gateway = FixtureManualGateway::seeded(vec![section("s1")]);
        let err = gateway
            .create_entry(&token(), &new_entry("missing", EntryKind::Comment))
            .await
            .expect_err("unknown section must fail");
        assert_eq!(err, ManualGatewayError::rejected("Section not found"));
    }

    #[rstest]
    #[tokio::test]
    async fn delete_entry_round_trips_by_identifier() {
        let gateway = FixtureManualGateway::seeded(vec![section("s1")]);
        let updated = gateway
            .create_entry(&token(), &new_entry("s1", EntryKind::Comment))
            .await
            .expect("create should succeed");
        let entry_id = updated.entries.of(EntryKind::Comment)[0]
            .id
            .clone()
            .expect("fixture assigns ids");

        let after = gateway
            .delete_entry(
                &token(),
                &SectionId::new("s1").expect("valid id"),
                EntryKind::Comment,
                &entry_id,
            )
            .await
            .expect("delete should succeed");
        assert_eq!(after.entry_count(EntryKind::Comment), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_section_removes_it_from_subsequent_fetches() {
        let gateway = FixtureManualGateway::seeded(vec![section("s1"), section("s2")]);
        gateway
            .delete_section(&token(), &SectionId::new("s1").expect("valid id"))
            .await
            .expect("delete should succeed");
        let remaining = gateway
            .fetch_sections(&token())
            .await
            .expect("fetch should succeed");
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id.as_ref(), "s2");
    }

    #[rstest]
    #[tokio::test]
    async fn update_section_applies_only_patched_fields() {
        let gateway = FixtureManualGateway::seeded(vec![section("s1")]);
        let patch = SectionPatch {
            title: Some("Amended directions".to_owned()),
            ..SectionPatch::default()
        };
        let updated = gateway
            .update_section(&token(), &SectionId::new("s1").expect("valid id"), &patch)
            .await
            .expect("update should succeed");
        assert_eq!(updated.title, "Amended directions");
        assert_eq!(updated.code, "1.1");
    }
}
