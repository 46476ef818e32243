//! End-to-end submission coverage: the full review scenario from login to
//! reconciled cache, strict validation, and partial-failure reporting.

use std::sync::Arc;

use client::app::{RegistryView, ReviewApp, SubmissionError};
use client::domain::ports::FixtureAuthenticationService;
use client::domain::{
    ActionChoice, EntryKind, LoginRequest, ManualSection, ReviewFields, Role, SectionEntries,
    SectionId, ServiceNumber,
};
use client::test_support::RecordingManualGateway;
use example_data::{SeedRegistry, generate_example_sections};
use mockable::DefaultClock;
use rstest::rstest;

const REGISTRY_JSON: &str = r#"{
    "version": 1,
    "parts": ["PART I", "PART II"],
    "seeds": [{"name": "bench-review", "seed": 42, "sectionCount": 3}]
}"#;

fn seeded_sections() -> Vec<ManualSection> {
    let registry = SeedRegistry::from_json(REGISTRY_JSON).expect("registry should parse");
    let seed = registry.find_seed("bench-review").expect("seed exists");
    generate_example_sections(&registry, seed)
        .expect("generation succeeds")
        .into_iter()
        .map(|section| ManualSection {
            id: SectionId::new(section.id).expect("generated ids are valid"),
            code: section.code,
            title: section.title,
            part: section.part,
            content: section.content,
            entries: SectionEntries::default(),
        })
        .collect()
}

fn full_fields() -> ReviewFields {
    ReviewFields {
        action: ActionChoice::Amend,
        rationale: "Conflicts with Article 50(2)(q).".to_owned(),
        references: "Constitution of Kenya, Article 50".to_owned(),
        wording: "Replace 'may' with 'shall'.".to_owned(),
    }
}

type TestApp = ReviewApp<
    FixtureAuthenticationService,
    RecordingManualGateway,
    client::domain::ports::InMemoryCredentialStore,
>;

fn build_app(gateway: Arc<RecordingManualGateway>) -> TestApp {
    ReviewApp::restore(
        Arc::new(FixtureAuthenticationService),
        gateway,
        Arc::new(client::domain::ports::InMemoryCredentialStore::new()),
        Arc::new(DefaultClock),
    )
}

#[rstest]
#[tokio::test]
async fn full_review_scenario_from_login_to_reconciled_cache() {
    let gateway = Arc::new(RecordingManualGateway::seeded(seeded_sections()));
    let mut app = build_app(Arc::clone(&gateway));

    // Login as a standard reviewer.
    let request = LoginRequest::new(ServiceNumber::new("PJ1001").expect("valid number"));
    let user = app.login(&request).await.expect("login should succeed");
    assert_eq!(user.role(), Role::Standard);

    // The registry loads three sections with unique identifiers.
    let count = app.load_sections().await.expect("load should succeed");
    assert_eq!(count, 3);
    let first = app
        .active_section()
        .cloned()
        .expect("first section selected");

    // Committing the four-field form issues exactly four writes.
    let outcome = app
        .commit_review(&first, &full_fields(), true)
        .await
        .expect("commit should succeed");

    let recorded = gateway.recorded_entries();
    assert_eq!(recorded.len(), 4, "one write per form field");
    let kinds: Vec<EntryKind> = recorded.iter().map(|entry| entry.kind).collect();
    assert_eq!(
        kinds,
        [
            EntryKind::Action,
            EntryKind::Justification,
            EntryKind::Reference,
            EntryKind::Amendment,
        ]
    );
    assert!(
        recorded.iter().all(|entry| entry.section_id == first),
        "all writes target the committed section"
    );

    // The cached copy shows each kind collection incremented by one.
    let cached = app
        .registry()
        .section(RegistryView::Standard, &first)
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

    // Commit-and-advance moved the active section forward.
    let advanced = outcome.advanced_to.expect("a next section exists");
    assert_ne!(advanced, first);
    assert_eq!(app.active_section(), Some(&advanced));
}

#[rstest]
#[case(ReviewFields { rationale: String::new(), ..full_fields() })]
#[case(ReviewFields { references: "   ".to_owned(), ..full_fields() })]
#[case(ReviewFields { wording: String::new(), ..full_fields() })]
#[tokio::test]
async fn strict_validation_blocks_submission_before_any_request(#[case] fields: ReviewFields) {
    let gateway = Arc::new(RecordingManualGateway::seeded(seeded_sections()));
    let mut app = build_app(Arc::clone(&gateway));
    let request = LoginRequest::new(ServiceNumber::new("PJ1001").expect("valid number"));
    app.login(&request).await.expect("login should succeed");
    app.load_sections().await.expect("load should succeed");
    let first = app
        .active_section()
        .cloned()
        .expect("first section selected");

    let err = app
        .commit_review(&first, &fields, false)
        .await
        .expect_err("blank field must fail");

    assert!(matches!(err, SubmissionError::InvalidForm(_)));
    assert!(
        gateway.recorded_entries().is_empty(),
        "no request may be issued for an invalid form"
    );
}

#[rstest]
#[tokio::test]
async fn partial_failure_reports_the_kinds_that_did_not_persist() {
    let gateway = Arc::new(RecordingManualGateway::seeded(seeded_sections()));
    gateway.fail_kind(EntryKind::Reference);
    let mut app = build_app(Arc::clone(&gateway));
    let request = LoginRequest::new(ServiceNumber::new("PJ1001").expect("valid number"));
    app.login(&request).await.expect("login should succeed");
    app.load_sections().await.expect("load should succeed");
    let first = app
        .active_section()
        .cloned()
        .expect("first section selected");

    let err = app
        .commit_review(&first, &full_fields(), true)
        .await
        .expect_err("injected failure must surface");

    match &err {
        SubmissionError::EntriesNotPersisted { failures } => {
            let kinds: Vec<EntryKind> = failures.iter().map(|failure| failure.kind).collect();
            assert_eq!(kinds, [EntryKind::Reference]);
        }
        other => panic!("expected aggregate failure, got: {other:?}"),
    }
    assert!(err.to_string().contains("reference"));

    // All four writes were still attempted; the succeeded ones are kept.
    assert_eq!(gateway.recorded_entries().len(), 4);
    let cached = app
        .registry()
        .section(RegistryView::Standard, &first)
        .expect("section cached");
    for kind in [EntryKind::Action, EntryKind::Justification, EntryKind::Amendment] {
        assert_eq!(cached.entry_count(kind), 1, "{kind} should have landed");
    }
    assert_eq!(
        cached.entry_count(EntryKind::Reference),
        0,
        "the failed write must not appear in the cache"
    );

    // A failed commit never advances the active section.
    assert_eq!(app.active_section(), Some(&first));
}
