//! Registry cache mirroring the server's manual sections.
//!
//! Two independent slots back the standard and administrator views so
//! switching views never forces a refetch. Each slot is an insertion-ordered
//! map keyed by section id: reconciliation after a write is an O(1) lookup
//! while the display order stays exactly as the server listed the sections.

use std::fmt;

use indexmap::IndexMap;

use crate::domain::{ManualSection, SectionId};

/// Error returned when a server response lists the same section twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateSectionError {
    /// The offending section identifier.
    pub id: SectionId,
}

impl fmt::Display for DuplicateSectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "duplicate section id in response: {}", self.id)
    }
}

impl std::error::Error for DuplicateSectionError {}

/// Which server view a slot mirrors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryView {
    /// The reviewer view (`/manual/get`).
    Standard,
    /// The administrator view (`/manual/admin`).
    Administrator,
}

/// One view's worth of sections in display order.
///
/// ## Invariants
/// - No two sections share an id.
/// - Iteration order is the server's listing order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SectionList {
    sections: IndexMap<SectionId, ManualSection>,
}

impl SectionList {
    /// Build a list from a server response, rejecting duplicate ids.
    pub fn try_new(sections: Vec<ManualSection>) -> Result<Self, DuplicateSectionError> {
        let mut map = IndexMap::with_capacity(sections.len());
        for section in sections {
            let id = section.id.clone();
            if map.insert(id.clone(), section).is_some() {
                return Err(DuplicateSectionError { id });
            }
        }
        Ok(Self { sections: map })
    }

    /// Number of sections in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the list holds no sections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Look up one section by id.
    #[must_use]
    pub fn get(&self, id: &SectionId) -> Option<&ManualSection> {
        self.sections.get(id)
    }

    /// Sections in display order.
    pub fn iter(&self) -> impl Iterator<Item = &ManualSection> {
        self.sections.values()
    }

    /// Id of the first section in display order.
    #[must_use]
    pub fn first_id(&self) -> Option<&SectionId> {
        self.sections.keys().next()
    }

    /// Id of the section following `id` in display order.
    #[must_use]
    pub fn next_after(&self, id: &SectionId) -> Option<&SectionId> {
        let index = self.sections.get_index_of(id)?;
        self.sections.get_index(index + 1).map(|(next, _)| next)
    }

    /// Replace the section with the same id, keeping its display position.
    /// Returns whether a replacement happened; absent ids are never
    /// inserted.
    pub fn replace(&mut self, section: &ManualSection) -> bool {
        match self.sections.get_mut(&section.id) {
            Some(slot) => {
                *slot = section.clone();
                true
            }
            None => false,
        }
    }

    /// Remove one section, shifting later sections up in display order.
    pub fn remove(&mut self, id: &SectionId) -> bool {
        self.sections.shift_remove(id).is_some()
    }
}

/// Cache of manual sections mirrored from the server.
///
/// The server is the source of truth: every write response replaces the
/// affected cached section wholesale, there is no partial merge. Concurrent
/// reloads are not coalesced; the last response applied wins.
#[derive(Debug, Default)]
pub struct RegistryCache {
    standard: Option<SectionList>,
    administrator: Option<SectionList>,
}

impl RegistryCache {
    /// Empty cache with neither view loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace one view's slot wholesale with a fresh server listing.
    pub fn replace(&mut self, view: RegistryView, list: SectionList) {
        match view {
            RegistryView::Standard => self.standard = Some(list),
            RegistryView::Administrator => self.administrator = Some(list),
        }
    }

    /// The cached list for one view, when that view has been loaded.
    #[must_use]
    pub const fn view(&self, view: RegistryView) -> Option<&SectionList> {
        match view {
            RegistryView::Standard => self.standard.as_ref(),
            RegistryView::Administrator => self.administrator.as_ref(),
        }
    }

    /// Look up one section in a specific view.
    #[must_use]
    pub fn section(&self, view: RegistryView, id: &SectionId) -> Option<&ManualSection> {
        self.view(view).and_then(|list| list.get(id))
    }

    /// Fold a server-returned section into every loaded slot that already
    /// holds its id. Sections absent from a slot are not inserted.
    pub fn reconcile(&mut self, section: &ManualSection) {
        for slot in [&mut self.standard, &mut self.administrator] {
            if let Some(list) = slot {
                list.replace(section);
            }
        }
    }

    /// Drop a deleted section from every loaded slot.
    pub fn remove(&mut self, id: &SectionId) {
        for slot in [&mut self.standard, &mut self.administrator] {
            if let Some(list) = slot {
                list.remove(id);
            }
        }
    }
}
