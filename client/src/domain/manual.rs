//! Manual section aggregate: draft provisions and their feedback entries.
//!
//! Sections are owned by the registry cache and treated as snapshots of
//! server state: a write never edits a cached section in place, it replaces
//! the whole section with the server's reply.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::{User, UserId};

/// Validation errors returned by the manual identifier constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManualValidationError {
    /// Section id was empty.
    EmptySectionId,
    /// Section id carried surrounding whitespace.
    PaddedSectionId,
    /// Entry id was empty.
    EmptyEntryId,
    /// Entry kind string was not one of the five known kinds.
    UnknownEntryKind {
        /// The rejected input.
        raw: String,
    },
}

impl fmt::Display for ManualValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySectionId => write!(f, "section id must not be empty"),
            Self::PaddedSectionId => {
                write!(f, "section id must not carry surrounding whitespace")
            }
            Self::EmptyEntryId => write!(f, "entry id must not be empty"),
            Self::UnknownEntryKind { raw } => write!(f, "unknown entry kind: {raw}"),
        }
    }
}

impl std::error::Error for ManualValidationError {}

/// Stable manual-section identifier assigned by the review service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SectionId(String);

impl SectionId {
    /// Validate and construct a [`SectionId`] from raw input.
    pub fn new(id: impl Into<String>) -> Result<Self, ManualValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ManualValidationError::EmptySectionId);
        }
        if id.trim() != id {
            return Err(ManualValidationError::PaddedSectionId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for SectionId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<SectionId> for String {
    fn from(value: SectionId) -> Self {
        value.0
    }
}

impl TryFrom<String> for SectionId {
    type Error = ManualValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Identifier of a single feedback entry inside a section collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntryId(String);

impl EntryId {
    /// Validate and construct an [`EntryId`] from raw input.
    pub fn new(id: impl Into<String>) -> Result<Self, ManualValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ManualValidationError::EmptyEntryId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for EntryId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EntryId> for String {
    fn from(value: EntryId) -> Self {
        value.0
    }
}

impl TryFrom<String> for EntryId {
    type Error = ManualValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// The five feedback entry kinds a section collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Free-form remark on a section.
    Comment,
    /// Proposed replacement wording.
    Amendment,
    /// Legal reasoning supporting a recommendation.
    Justification,
    /// Constitutional, case-law, or statutory references.
    Reference,
    /// Recommended action on the section.
    Action,
}

impl EntryKind {
    /// All kinds in the order the service lists their collections.
    pub const ALL: [Self; 5] = [
        Self::Comment,
        Self::Amendment,
        Self::Justification,
        Self::Reference,
        Self::Action,
    ];

    /// Wire name used in entry payloads and routes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Comment => "comment",
            Self::Amendment => "amendment",
            Self::Justification => "justification",
            Self::Reference => "reference",
            Self::Action => "action",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryKind {
    type Err = ManualValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "comment" | "comments" => Ok(Self::Comment),
            "amendment" | "amendments" => Ok(Self::Amendment),
            "justification" | "justifications" => Ok(Self::Justification),
            "reference" | "references" => Ok(Self::Reference),
            "action" | "actions" => Ok(Self::Action),
            _ => Err(ManualValidationError::UnknownEntryKind {
                raw: raw.to_owned(),
            }),
        }
    }
}

/// Entry author as the service reports it.
///
/// The standard view carries bare reviewer ids; the administrator view
/// resolves them to full identities.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryAuthor {
    /// Bare reviewer id (standard view).
    Reference(UserId),
    /// Full reviewer identity (administrator view).
    Identity(User),
}

impl EntryAuthor {
    /// Reviewer id regardless of how much identity was resolved.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        match self {
            Self::Reference(id) => id,
            Self::Identity(user) => user.id(),
        }
    }
}

/// One immutable feedback entry inside a section collection.
///
/// Entries are append-only from the client's perspective; the only mutation
/// the service supports is deletion by identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Entry identifier, when the service exposes one.
    pub id: Option<EntryId>,
    /// Who submitted the entry.
    pub author: EntryAuthor,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
    /// The entry text (action choice, justification, reference, or wording).
    pub text: String,
}

/// The five feedback collections of one section.
///
/// ## Invariants
/// - Collections are insertion-ordered as received and never reordered
///   client-side.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SectionEntries {
    /// Free-form remarks.
    pub comments: Vec<Entry>,
    /// Proposed replacement wording.
    pub amendments: Vec<Entry>,
    /// Legal reasoning.
    pub justifications: Vec<Entry>,
    /// Cited references.
    pub references: Vec<Entry>,
    /// Recommended actions.
    pub actions: Vec<Entry>,
}

impl SectionEntries {
    /// Collection for one entry kind.
    #[must_use]
    pub fn of(&self, kind: EntryKind) -> &[Entry] {
        match kind {
            EntryKind::Comment => &self.comments,
            EntryKind::Amendment => &self.amendments,
            EntryKind::Justification => &self.justifications,
            EntryKind::Reference => &self.references,
            EntryKind::Action => &self.actions,
        }
    }

    /// Mutable collection for one entry kind.
    pub fn of_mut(&mut self, kind: EntryKind) -> &mut Vec<Entry> {
        match kind {
            EntryKind::Comment => &mut self.comments,
            EntryKind::Amendment => &mut self.amendments,
            EntryKind::Justification => &mut self.justifications,
            EntryKind::Reference => &mut self.references,
            EntryKind::Action => &mut self.actions,
        }
    }
}

/// One draft manual section as mirrored from the review service.
#[derive(Debug, Clone, PartialEq)]
pub struct ManualSection {
    /// Stable section identifier.
    pub id: SectionId,
    /// Citation code, for example `3.12`.
    pub code: String,
    /// Section heading.
    pub title: String,
    /// Manual part the section belongs to, for example `PART II`.
    pub part: String,
    /// Draft provision text.
    pub content: String,
    /// Feedback collections keyed by entry kind.
    pub entries: SectionEntries,
}

impl ManualSection {
    /// Number of entries of one kind.
    #[must_use]
    pub fn entry_count(&self, kind: EntryKind) -> usize {
        self.entries.of(kind).len()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("comment", EntryKind::Comment)]
    #[case("Comments", EntryKind::Comment)]
    #[case("AMENDMENT", EntryKind::Amendment)]
    #[case("justifications", EntryKind::Justification)]
    #[case("reference", EntryKind::Reference)]
    #[case("actions", EntryKind::Action)]
    fn parses_entry_kinds_including_collection_names(
        #[case] raw: &str,
        #[case] expected: EntryKind,
    ) {
        let parsed: EntryKind = raw.parse().expect("known kind should parse");
        assert_eq!(parsed, expected);
    }

    #[test]
    fn rejects_unknown_entry_kind() {
        let err = "annotation".parse::<EntryKind>().expect_err("must fail");
        assert!(matches!(err, ManualValidationError::UnknownEntryKind { .. }));
    }

    #[test]
    fn entry_kind_wire_names_round_trip_through_serde() {
        for kind in EntryKind::ALL {
            let encoded = serde_json::to_string(&kind).expect("kind should encode");
            assert_eq!(encoded, format!("\"{}\"", kind.as_str()));
        }
    }

    #[rstest]
    #[case("", ManualValidationError::EmptySectionId)]
    #[case(" s1 ", ManualValidationError::PaddedSectionId)]
    fn rejects_malformed_section_ids(
        #[case] raw: &str,
        #[case] expected: ManualValidationError,
    ) {
        let err = SectionId::new(raw).expect_err("invalid id must fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn collections_are_addressable_by_kind() {
        let mut entries = SectionEntries::default();
        entries.of_mut(EntryKind::Reference).push(Entry {
            id: None,
            author: EntryAuthor::Reference(UserId::new("64a1").expect("valid id")),
            created_at: Utc::now(),
            text: "Article 159".to_owned(),
        });
        assert_eq!(entries.of(EntryKind::Reference).len(), 1);
        assert!(entries.of(EntryKind::Comment).is_empty());
    }
}
