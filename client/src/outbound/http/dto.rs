//! Wire DTOs for the review service's JSON payloads.
//!
//! Decoding is two-phase: serde parses the loose wire shape, then
//! `into_domain` enforces domain invariants (valid identifiers, the right
//! text field for each entry collection). Conversion errors are plain
//! strings; the adapters wrap them into `Decode` port errors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Entry, EntryAuthor, EntryId, EntryKind, ManualSection, SectionEntries, SectionId, User, UserId,
};

/// Generic `{ "data": ... }` envelope the service wraps responses in.
#[derive(Debug, Deserialize)]
pub(crate) struct DataEnvelopeDto<T> {
    pub(crate) data: T,
}

/// Login response: bearer token plus the reviewer identity.
#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponseDto {
    pub(crate) token: String,
    pub(crate) data: User,
}

/// Login request body; the secret is omitted when absent.
#[derive(Debug, Serialize)]
pub(crate) struct LoginBodyDto<'a> {
    pub(crate) pj: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) password: Option<&'a str>,
}

/// Create-entry request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewEntryBodyDto<'a> {
    pub(crate) section_id: &'a str,
    pub(crate) user_id: &'a str,
    pub(crate) content: &'a str,
    #[serde(rename = "type")]
    pub(crate) kind: &'a str,
}

/// Section-metadata update body; absent fields are left unchanged.
#[derive(Debug, Serialize)]
pub(crate) struct SectionPatchBodyDto<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) part: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) content: Option<&'a str>,
}

/// Entry author: a bare id in the standard view, a full identity in the
/// administrator view.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum AuthorDto {
    Identity(User),
    Id(String),
}

impl AuthorDto {
    fn into_domain(self) -> Result<EntryAuthor, String> {
        match self {
            Self::Identity(user) => Ok(EntryAuthor::Identity(user)),
            Self::Id(id) => UserId::new(id)
                .map(EntryAuthor::Reference)
                .map_err(|err| format!("invalid entry author: {err}")),
        }
    }
}

/// One feedback entry; exactly one of the five text fields is expected,
/// matching the collection the entry arrived in.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EntryDto {
    #[serde(rename = "_id", alias = "id", default)]
    id: Option<String>,
    user_id: AuthorDto,
    created_at: DateTime<Utc>,
    #[serde(default)]
    comment: Option<String>,
    #[serde(default)]
    proposed_change: Option<String>,
    #[serde(default)]
    justification: Option<String>,
    #[serde(default)]
    reference: Option<String>,
    #[serde(default)]
    action: Option<String>,
}

impl EntryDto {
    fn into_domain(self, kind: EntryKind) -> Result<Entry, String> {
        let Self {
            id,
            user_id,
            created_at,
            comment,
            proposed_change,
            justification,
            reference,
            action,
        } = self;

        let text = match kind {
            EntryKind::Comment => comment,
            EntryKind::Amendment => proposed_change,
            EntryKind::Justification => justification,
            EntryKind::Reference => reference,
            EntryKind::Action => action,
        }
        .ok_or_else(|| format!("{kind} entry missing its text field"))?;

        let id = match id {
            Some(raw) => Some(
                EntryId::new(raw).map_err(|err| format!("invalid entry id: {err}"))?,
            ),
            None => None,
        };

        Ok(Entry {
            id,
            author: user_id.into_domain()?,
            created_at,
            text,
        })
    }
}

/// One manual section with its five entry collections.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ManualSectionDto {
    #[serde(rename = "_id", alias = "id")]
    id: String,
    code: String,
    title: String,
    part: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    comments: Vec<EntryDto>,
    #[serde(default)]
    amendments: Vec<EntryDto>,
    #[serde(default)]
    justifications: Vec<EntryDto>,
    #[serde(default)]
    references: Vec<EntryDto>,
    #[serde(default)]
    actions: Vec<EntryDto>,
}

fn collection_into_domain(
    entries: Vec<EntryDto>,
    kind: EntryKind,
) -> Result<Vec<Entry>, String> {
    entries
        .into_iter()
        .map(|entry| entry.into_domain(kind))
        .collect()
}

impl ManualSectionDto {
    pub(crate) fn into_domain(self) -> Result<ManualSection, String> {
        let Self {
            id,
            code,
            title,
            part,
            content,
            comments,
            amendments,
            justifications,
            references,
            actions,
        } = self;

        Ok(ManualSection {
            id: SectionId::new(id).map_err(|err| format!("invalid section id: {err}"))?,
            code,
            title,
            part,
            content: content.unwrap_or_default(),
            entries: SectionEntries {
                comments: collection_into_domain(comments, EntryKind::Comment)?,
                amendments: collection_into_domain(amendments, EntryKind::Amendment)?,
                justifications: collection_into_domain(justifications, EntryKind::Justification)?,
                references: collection_into_domain(references, EntryKind::Reference)?,
                actions: collection_into_domain(actions, EntryKind::Action)?,
            },
        })
    }
}

/// Decode a list of sections from the wire.
pub(crate) fn sections_into_domain(
    sections: Vec<ManualSectionDto>,
) -> Result<Vec<ManualSection>, String> {
    sections
        .into_iter()
        .map(ManualSectionDto::into_domain)
        .collect()
}
