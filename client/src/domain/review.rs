//! Structured feedback form for one manual section.
//!
//! The form is the client-side gate for the submission workflow: a
//! [`ReviewForm`] can only be constructed once every field passes the strict
//! validation policy, so a constructed form is always safe to fan out into
//! entry writes.

use std::fmt;
use std::str::FromStr;

use super::manual::EntryKind;

/// Validation errors returned by [`ReviewForm::try_from_parts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewFormValidationError {
    /// Rationale text was blank once trimmed.
    EmptyRationale,
    /// References text was blank once trimmed.
    EmptyReferences,
    /// Proposed wording was blank once trimmed.
    EmptyWording,
    /// Action string did not match a known choice.
    UnknownAction {
        /// The rejected input.
        raw: String,
    },
}

impl fmt::Display for ReviewFormValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRationale => {
                write!(f, "a rationale for the recommendation is required")
            }
            Self::EmptyReferences => {
                write!(f, "at least one supporting reference is required")
            }
            Self::EmptyWording => {
                write!(f, "the proposed wording must not be empty")
            }
            Self::UnknownAction { raw } => write!(f, "unknown recommended action: {raw}"),
        }
    }
}

impl std::error::Error for ReviewFormValidationError {}

/// Recommended action on a section (Field 1 of the review form).
///
/// The choice always has a value, so unlike the free-text fields it can
/// never leave a submission empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionChoice {
    /// Amend the provision.
    #[default]
    Amend,
    /// Clarify the provision.
    Clarify,
    /// Retain the provision as drafted.
    RetainAsIs,
    /// Delete the provision.
    Delete,
    /// No comment on this section.
    NoComment,
}

impl ActionChoice {
    /// Text submitted as the action entry's content.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Amend => "Amend",
            Self::Clarify => "Clarify",
            Self::RetainAsIs => "Retain as is",
            Self::Delete => "Delete",
            Self::NoComment => "No comment in this section",
        }
    }
}

impl fmt::Display for ActionChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionChoice {
    type Err = ReviewFormValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "amend" => Ok(Self::Amend),
            "clarify" => Ok(Self::Clarify),
            "retain" | "retain-as-is" | "retain as is" => Ok(Self::RetainAsIs),
            "delete" => Ok(Self::Delete),
            "no-comment" | "no comment" | "no comment in this section" => Ok(Self::NoComment),
            _ => Err(ReviewFormValidationError::UnknownAction {
                raw: raw.to_owned(),
            }),
        }
    }
}

/// Raw, unvalidated form input as collected from the caller.
///
/// The submission workflow validates this into a [`ReviewForm`] before any
/// request is issued; an invalid form never produces network side effects.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReviewFields {
    /// Recommended action (Field 1); always carries a value.
    pub action: ActionChoice,
    /// Rationale / justification text (Field 2).
    pub rationale: String,
    /// Supporting references text (Field 3).
    pub references: String,
    /// Proposed wording text (Field 4).
    pub wording: String,
}

impl ReviewFields {
    /// Apply the strict validation policy, yielding a submit-ready form.
    pub fn validate(&self) -> Result<ReviewForm, ReviewFormValidationError> {
        ReviewForm::try_from_parts(self.action, &self.rationale, &self.references, &self.wording)
    }
}

/// Validated four-field feedback form.
///
/// ## Invariants
/// - `rationale`, `references`, and `wording` are trimmed and non-empty.
///
/// # Examples
/// ```
/// use client::domain::{ActionChoice, ReviewForm};
///
/// let form = ReviewForm::try_from_parts(
///     ActionChoice::Amend,
///     "Conflicts with Article 50(2)(q).",
///     "Constitution of Kenya, Article 50",
///     "Replace 'may' with 'shall'.",
/// )
/// .expect("all fields populated");
/// assert_eq!(form.action(), ActionChoice::Amend);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewForm {
    action: ActionChoice,
    rationale: String,
    references: String,
    wording: String,
}

impl ReviewForm {
    /// Construct a form from raw field inputs, enforcing the strict policy:
    /// every free-text field must be non-empty once trimmed.
    pub fn try_from_parts(
        action: ActionChoice,
        rationale: &str,
        references: &str,
        wording: &str,
    ) -> Result<Self, ReviewFormValidationError> {
        let rationale = rationale.trim();
        if rationale.is_empty() {
            return Err(ReviewFormValidationError::EmptyRationale);
        }
        let references = references.trim();
        if references.is_empty() {
            return Err(ReviewFormValidationError::EmptyReferences);
        }
        let wording = wording.trim();
        if wording.is_empty() {
            return Err(ReviewFormValidationError::EmptyWording);
        }
        Ok(Self {
            action,
            rationale: rationale.to_owned(),
            references: references.to_owned(),
            wording: wording.to_owned(),
        })
    }

    /// Recommended action (Field 1).
    #[must_use]
    pub const fn action(&self) -> ActionChoice {
        self.action
    }

    /// Rationale / justification text (Field 2).
    #[must_use]
    pub fn rationale(&self) -> &str {
        self.rationale.as_str()
    }

    /// Supporting references text (Field 3).
    #[must_use]
    pub fn references(&self) -> &str {
        self.references.as_str()
    }

    /// Proposed wording text (Field 4).
    #[must_use]
    pub fn wording(&self) -> &str {
        self.wording.as_str()
    }

    /// The four entry payloads this form expands into, as `(kind, text)`
    /// pairs in submission order.
    #[must_use]
    pub fn entry_texts(&self) -> [(EntryKind, &str); 4] {
        [
            (EntryKind::Action, self.action.as_str()),
            (EntryKind::Justification, self.rationale.as_str()),
            (EntryKind::Reference, self.references.as_str()),
            (EntryKind::Amendment, self.wording.as_str()),
        ]
    }
}
