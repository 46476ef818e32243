//! Entry submission workflow: fan a review form out into entry writes.
//!
//! One create-entry request per form field, issued concurrently with no
//! atomicity across them: a failing request never rolls back the ones that
//! succeeded, the server keeps whatever landed. Each successful reply is
//! the full updated section and is folded into the registry cache; failures
//! are reported as one aggregate error naming the kinds that did not
//! persist.

use std::fmt;
use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::ports::{
    AuthenticationService, CredentialStore, ManualGateway, ManualGatewayError, NewEntry,
};
use crate::domain::{EntryKind, ReviewFields, ReviewFormValidationError, SectionId};

use super::registry::RegistryView;
use super::{RequestCategory, ReviewApp, surface_message};

/// One field write that did not persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFailure {
    /// The entry kind that failed.
    pub kind: EntryKind,
    /// The gateway error behind the failure.
    pub error: ManualGatewayError,
}

impl fmt::Display for EntryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.error)
    }
}

fn failed_kinds(failures: &[EntryFailure]) -> String {
    let kinds: Vec<&str> = failures
        .iter()
        .map(|failure| failure.kind.as_str())
        .collect();
    kinds.join(", ")
}

/// Errors returned by [`ReviewApp::commit_review`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    /// No authenticated session is present.
    #[error("not authenticated")]
    NotAuthenticated,
    /// The form failed the strict validation policy; no request was issued.
    #[error(transparent)]
    InvalidForm(#[from] ReviewFormValidationError),
    /// Some writes did not persist. Succeeded writes are kept server-side
    /// and already reconciled into the cache.
    #[error("entries not persisted: {}", failed_kinds(.failures))]
    EntriesNotPersisted {
        /// Per-kind failures, in submission order.
        failures: Vec<EntryFailure>,
    },
}

/// Result of a successful commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    /// The section the review was committed against.
    pub section: SectionId,
    /// The next section selected for review when "commit and advance" was
    /// requested and a next section exists.
    pub advanced_to: Option<SectionId>,
}

impl<A, G, S> ReviewApp<A, G, S>
where
    A: AuthenticationService,
    G: ManualGateway,
    S: CredentialStore,
{
    /// Commit a four-field review against one section.
    ///
    /// Validates the fields strictly before any network call, then issues
    /// one create-entry request per field concurrently and awaits all of
    /// them. With `advance`, a fully successful commit moves the active
    /// section to the next one in display order.
    ///
    /// # Errors
    ///
    /// [`SubmissionError::InvalidForm`] before any request side effect;
    /// [`SubmissionError::EntriesNotPersisted`] when any write failed
    /// (succeeded writes are not rolled back).
    pub async fn commit_review(
        &mut self,
        section_id: &SectionId,
        fields: &ReviewFields,
        advance: bool,
    ) -> Result<CommitOutcome, SubmissionError> {
        let form = fields.validate()?;
        let token = self
            .session()
            .token()
            .cloned()
            .ok_or(SubmissionError::NotAuthenticated)?;
        let author = self
            .session()
            .identity()
            .map(|user| user.id().clone())
            .ok_or(SubmissionError::NotAuthenticated)?;

        let commit_id = Uuid::new_v4();
        info!(commit = %commit_id, section = %section_id, "committing review");

        let writes = form.entry_texts().map(|(kind, text)| NewEntry {
            section_id: section_id.clone(),
            author_id: author.clone(),
            kind,
            content: text.to_owned(),
        });

        self.loading_mut().begin(RequestCategory::Write);
        let pending = writes.into_iter().map(|entry| {
            let gateway = Arc::clone(self.gateway());
            let token = token.clone();
            async move {
                let result = gateway.create_entry(&token, &entry).await;
                (entry.kind, result)
            }
        });
        let settled = join_all(pending).await;
        self.loading_mut().settle(RequestCategory::Write);

        let mut failures = Vec::new();
        for (kind, result) in settled {
            match result {
                Ok(section) => self.registry_mut().reconcile(&section),
                Err(error) => {
                    debug!(commit = %commit_id, kind = %kind, error = %error, "entry write failed");
                    failures.push(EntryFailure { kind, error });
                }
            }
        }

        if let Some(first) = failures.first() {
            let message = surface_message(&first.error, &format!("Failed to post {}", first.kind));
            self.record_write_error(Some(message));
            return Err(SubmissionError::EntriesNotPersisted { failures });
        }
        self.record_write_error(None);

        let advanced_to = if advance {
            self.sections(RegistryView::Standard)
                .and_then(|list| list.next_after(section_id))
                .cloned()
        } else {
            None
        };
        if let Some(next) = &advanced_to {
            self.set_active_section(next.clone());
        }

        info!(commit = %commit_id, section = %section_id, advanced = advanced_to.is_some(), "review committed");
        Ok(CommitOutcome {
            section: section_id.clone(),
            advanced_to,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the submission workflow.
    use super::*;
    use crate::domain::ports::{
        FixtureAuthenticationService, FixtureManualGateway, InMemoryCredentialStore,
    };
    use crate::domain::{
        ActionChoice, LoginRequest, ManualSection, SectionEntries, ServiceNumber,
    };
    use mockable::DefaultClock;
    use rstest::rstest;

    fn section(id: &str) -> ManualSection {
        ManualSection {
            id: SectionId::new(id).expect("valid id"),
            code: "1.1".to_owned(),
            title: "Pre-trial directions".to_owned(),
            part: "PART I".to_owned(),
            content: String::new(),
            entries: SectionEntries::default(),
        }
    }

    fn fields() -> ReviewFields {
        ReviewFields {
            action: ActionChoice::Amend,
            rationale: "Conflicts with Article 50.".to_owned(),
            references: "Constitution, Article 50".to_owned(),
            wording: "Replace 'may' with 'shall'.".to_owned(),
        }
    }

    async fn logged_in_app(
        sections: Vec<ManualSection>,
    ) -> ReviewApp<FixtureAuthenticationService, FixtureManualGateway, InMemoryCredentialStore>
    {
        let mut app = ReviewApp::restore(
            Arc::new(FixtureAuthenticationService),
            Arc::new(FixtureManualGateway::seeded(sections)),
            Arc::new(InMemoryCredentialStore::new()),
            Arc::new(DefaultClock),
        );
        let request = LoginRequest::new(ServiceNumber::new("PJ1001").expect("valid number"));
        app.login(&request).await.expect("login should succeed");
        app.load_sections().await.expect("load should succeed");
        app
    }

    #[rstest]
    #[tokio::test]
    async fn full_commit_adds_one_entry_per_kind_collection() {
        let mut app = logged_in_app(vec![section("s1"), section("s2")]).await;
        let target = SectionId::new("s1").expect("valid id");

        app.commit_review(&target, &fields(), false)
            .await
            .expect("commit should succeed");

        let cached = app
            .registry()
            .section(RegistryView::Standard, &target)
            .expect("section cached");
        for kind in [
            EntryKind::Action,
            EntryKind::Justification,
            EntryKind::Reference,
            EntryKind::Amendment,
        ] {
            assert_eq!(cached.entry_count(kind), 1, "expected one {kind} entry");
        }
        assert_eq!(cached.entry_count(EntryKind::Comment), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn commit_and_advance_selects_the_next_section() {
        let mut app = logged_in_app(vec![section("s1"), section("s2")]).await;
        let target = SectionId::new("s1").expect("valid id");

        let outcome = app
            .commit_review(&target, &fields(), true)
            .await
            .expect("commit should succeed");

        assert_eq!(outcome.advanced_to.as_ref().map(SectionId::as_ref), Some("s2"));
        assert_eq!(app.active_section().map(SectionId::as_ref), Some("s2"));
    }

    #[rstest]
    #[tokio::test]
    async fn commit_on_the_last_section_does_not_advance() {
        let mut app = logged_in_app(vec![section("s1")]).await;
        let target = SectionId::new("s1").expect("valid id");

        let outcome = app
            .commit_review(&target, &fields(), true)
            .await
            .expect("commit should succeed");

        assert!(outcome.advanced_to.is_none());
        assert_eq!(app.active_section().map(SectionId::as_ref), Some("s1"));
    }

    #[rstest]
    #[case("", "refs", "words")]
    #[case("why", "", "words")]
    #[case("why", "refs", "")]
    #[tokio::test]
    async fn invalid_form_rejects_before_any_request(
        #[case] rationale: &str,
        #[case] references: &str,
        #[case] wording: &str,
    ) {
        let mut app = logged_in_app(vec![section("s1")]).await;
        let target = SectionId::new("s1").expect("valid id");
        let fields = ReviewFields {
            action: ActionChoice::Amend,
            rationale: rationale.to_owned(),
            references: references.to_owned(),
            wording: wording.to_owned(),
        };

        let err = app
            .commit_review(&target, &fields, false)
            .await
            .expect_err("blank field must fail");

        assert!(matches!(err, SubmissionError::InvalidForm(_)));
        let cached = app
            .registry()
            .section(RegistryView::Standard, &target)
            .expect("section cached");
        for kind in EntryKind::ALL {
            assert_eq!(cached.entry_count(kind), 0, "no {kind} entry may exist");
        }
    }

    #[rstest]
    #[tokio::test]
    async fn anonymous_commit_is_rejected_without_side_effects() {
        let mut app = ReviewApp::restore(
            Arc::new(FixtureAuthenticationService),
            Arc::new(FixtureManualGateway::seeded(vec![section("s1")])),
            Arc::new(InMemoryCredentialStore::new()),
            Arc::new(DefaultClock),
        );
        let target = SectionId::new("s1").expect("valid id");

        let err = app
            .commit_review(&target, &fields(), false)
            .await
            .expect_err("anonymous commit must fail");
        assert!(matches!(err, SubmissionError::NotAuthenticated));
    }

    #[rstest]
    #[tokio::test]
    async fn commit_against_a_vanished_section_reports_all_kinds() {
        let mut app = logged_in_app(vec![section("s1")]).await;
        let ghost = SectionId::new("ghost").expect("valid id");

        let err = app
            .commit_review(&ghost, &fields(), false)
            .await
            .expect_err("unknown section must fail");

        match err {
            SubmissionError::EntriesNotPersisted { failures } => {
                assert_eq!(failures.len(), 4, "all four writes should fail");
            }
            other => panic!("expected aggregate failure, got: {other:?}"),
        }
        assert_eq!(app.write_error(), Some("Section not found"));
    }
}
