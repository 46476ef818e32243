//! Application layer: the state container and the workflows it drives.
//!
//! [`ReviewApp`] is the explicit application-state container — session,
//! registry cache, active-section pointer, loading flags, and transient
//! error strings — passed by handle wherever it is needed. There are no
//! ambient singletons; every collaborator arrives through a constructor.

mod registry;
mod session;
mod submission;

pub use registry::{DuplicateSectionError, RegistryCache, RegistryView, SectionList};
pub use session::{AuthenticationFailed, SessionManager};
pub use submission::{CommitOutcome, EntryFailure, SubmissionError};

use std::sync::Arc;

use chrono::NaiveDate;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{
    AuthenticationService, CredentialStore, ManualGateway, ManualGatewayError, ReportDocument,
    SectionPatch,
};
use crate::domain::{
    AccessToken, EntryId, EntryKind, LoginRequest, SectionId, Session, User, UserId,
};

/// Request categories sharing one loading flag each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestCategory {
    /// Login requests.
    Authentication,
    /// Section reads and report downloads.
    Fetch,
    /// Entry creation, section edits, and deletions.
    Write,
}

/// One loading flag per request category, not per in-flight request.
///
/// Overlapping requests of the same category share a flag, and the first
/// one to settle clears it — the flag can under-report true in-flight
/// state. Known limitation of the mirrored behaviour; callers wanting
/// accuracy must track their own requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadingFlags {
    authentication: bool,
    fetch: bool,
    write: bool,
}

impl LoadingFlags {
    fn begin(&mut self, category: RequestCategory) {
        match category {
            RequestCategory::Authentication => self.authentication = true,
            RequestCategory::Fetch => self.fetch = true,
            RequestCategory::Write => self.write = true,
        }
    }

    fn settle(&mut self, category: RequestCategory) {
        match category {
            RequestCategory::Authentication => self.authentication = false,
            RequestCategory::Fetch => self.fetch = false,
            RequestCategory::Write => self.write = false,
        }
    }

    /// Whether a request of the category is (believed to be) in flight.
    #[must_use]
    pub const fn is_loading(self, category: RequestCategory) -> bool {
        match category {
            RequestCategory::Authentication => self.authentication,
            RequestCategory::Fetch => self.fetch,
            RequestCategory::Write => self.write,
        }
    }
}

/// Errors returned by the registry-facing application operations.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// No authenticated session is present.
    #[error("not authenticated")]
    NotAuthenticated,
    /// The gateway reported a failure.
    #[error(transparent)]
    Gateway(#[from] ManualGatewayError),
    /// A server listing repeated a section id.
    #[error(transparent)]
    InvalidListing(#[from] DuplicateSectionError),
}

/// Application-state container for the review workflow.
///
/// Generic over the three ports so tests substitute doubles freely.
pub struct ReviewApp<A, G, S> {
    session: SessionManager<A, S>,
    gateway: Arc<G>,
    clock: Arc<dyn Clock>,
    registry: RegistryCache,
    active_section: Option<SectionId>,
    loading: LoadingFlags,
    fetch_error: Option<String>,
    write_error: Option<String>,
}

/// Map a gateway error to the short string shown to the reviewer: the
/// service's own wording when it supplied any, else the per-operation
/// fallback.
fn surface_message(error: &ManualGatewayError, fallback: &str) -> String {
    match error {
        ManualGatewayError::Rejected { message }
        | ManualGatewayError::Unauthorized { message } => message.clone(),
        _ => fallback.to_owned(),
    }
}

/// Derive the client-side filename for a downloaded report.
fn report_filename(for_user: Option<&UserId>, date: NaiveDate) -> String {
    match for_user {
        Some(id) => format!("User_{id}_Manual_Report_{date}.pdf"),
        None => format!("Admin_Manual_Report_{date}.pdf"),
    }
}

impl<A, G, S> ReviewApp<A, G, S>
where
    A: AuthenticationService,
    G: ManualGateway,
    S: CredentialStore,
{
    /// Assemble the container from its collaborators, restoring any
    /// persisted session.
    pub fn restore(auth: Arc<A>, gateway: Arc<G>, store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            session: SessionManager::restore(auth, store),
            gateway,
            clock,
            registry: RegistryCache::new(),
            active_section: None,
            loading: LoadingFlags::default(),
            fetch_error: None,
            write_error: None,
        }
    }

    /// Current session state.
    #[must_use]
    pub const fn session(&self) -> &Session {
        self.session.session()
    }

    /// Cached sections for one view, when loaded.
    #[must_use]
    pub const fn sections(&self, view: RegistryView) -> Option<&SectionList> {
        self.registry.view(view)
    }

    /// Shared registry cache state.
    #[must_use]
    pub const fn registry(&self) -> &RegistryCache {
        &self.registry
    }

    /// Section currently under review, when one is selected.
    #[must_use]
    pub const fn active_section(&self) -> Option<&SectionId> {
        self.active_section.as_ref()
    }

    /// Loading flags per request category.
    #[must_use]
    pub const fn loading(&self) -> LoadingFlags {
        self.loading
    }

    /// Transient message from the last failed read, if any.
    #[must_use]
    pub fn fetch_error(&self) -> Option<&str> {
        self.fetch_error.as_deref()
    }

    /// Transient message from the last failed write, if any.
    #[must_use]
    pub fn write_error(&self) -> Option<&str> {
        self.write_error.as_deref()
    }

    /// Discard transient error state, as on navigation away from a form.
    pub fn clear_errors(&mut self) {
        self.fetch_error = None;
        self.write_error = None;
        self.session.clear_error();
    }

    pub(crate) fn require_token(&self) -> Result<AccessToken, AppError> {
        self.session.token().cloned().ok_or(AppError::NotAuthenticated)
    }

    pub(crate) const fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    pub(crate) fn registry_mut(&mut self) -> &mut RegistryCache {
        &mut self.registry
    }

    pub(crate) fn loading_mut(&mut self) -> &mut LoadingFlags {
        &mut self.loading
    }

    pub(crate) fn record_write_error(&mut self, message: Option<String>) {
        self.write_error = message;
    }

    pub(crate) fn set_active_section(&mut self, id: SectionId) {
        self.active_section = Some(id);
    }

    /// Sign in with the given request.
    ///
    /// # Errors
    ///
    /// Returns [`AuthenticationFailed`] with the message also recorded on
    /// the session; the application stays interactive and the caller may
    /// retry.
    pub async fn login(&mut self, request: &LoginRequest) -> Result<User, AuthenticationFailed> {
        self.loading.begin(RequestCategory::Authentication);
        let result = self.session.authenticate(request).await.cloned();
        self.loading.settle(RequestCategory::Authentication);
        result
    }

    /// Sign out unconditionally. The registry cache is left untouched:
    /// session and registry are independent.
    pub fn logout(&mut self) {
        self.session.terminate();
    }

    /// Load the standard reviewer view, replacing the cached slot.
    pub async fn load_sections(&mut self) -> Result<usize, AppError> {
        self.load_view(RegistryView::Standard).await
    }

    /// Load the administrator view, replacing the cached slot.
    pub async fn load_sections_admin(&mut self) -> Result<usize, AppError> {
        self.load_view(RegistryView::Administrator).await
    }

    async fn load_view(&mut self, view: RegistryView) -> Result<usize, AppError> {
        let token = self.require_token()?;
        self.loading.begin(RequestCategory::Fetch);
        let result = match view {
            RegistryView::Standard => self.gateway.fetch_sections(&token).await,
            RegistryView::Administrator => self.gateway.fetch_sections_admin(&token).await,
        };
        self.loading.settle(RequestCategory::Fetch);

        let sections = result.inspect_err(|err| {
            self.fetch_error = Some(surface_message(err, "Fetch failed"));
        })?;
        let list = SectionList::try_new(sections).inspect_err(|err| {
            self.fetch_error = Some(err.to_string());
        })?;
        let count = list.len();

        if view == RegistryView::Standard && self.active_section.is_none() {
            self.active_section = list.first_id().cloned();
        }
        self.registry.replace(view, list);
        self.fetch_error = None;
        info!(count, ?view, "sections loaded");
        Ok(count)
    }

    /// Select the section under review. Returns false when the id is not in
    /// the loaded standard view.
    pub fn select_section(&mut self, id: &SectionId) -> bool {
        let known = self
            .registry
            .view(RegistryView::Standard)
            .is_some_and(|list| list.get(id).is_some());
        if known {
            self.active_section = Some(id.clone());
        }
        known
    }

    /// Update section metadata (administrator), reconciling the reply into
    /// the cache.
    pub async fn edit_section(
        &mut self,
        id: &SectionId,
        patch: &SectionPatch,
    ) -> Result<(), AppError> {
        let token = self.require_token()?;
        self.loading.begin(RequestCategory::Write);
        let result = self.gateway.update_section(&token, id, patch).await;
        self.loading.settle(RequestCategory::Write);

        let section = result.inspect_err(|err| {
            self.write_error = Some(surface_message(err, "Update failed"));
        })?;
        self.registry.reconcile(&section);
        self.write_error = None;
        Ok(())
    }

    /// Strike a section from the registry (administrator), removing it from
    /// every cached view.
    pub async fn remove_section(&mut self, id: &SectionId) -> Result<(), AppError> {
        let token = self.require_token()?;
        self.loading.begin(RequestCategory::Write);
        let result = self.gateway.delete_section(&token, id).await;
        self.loading.settle(RequestCategory::Write);

        result.inspect_err(|err| {
            self.write_error = Some(surface_message(err, "Delete failed"));
        })?;
        self.registry.remove(id);
        self.write_error = None;
        Ok(())
    }

    /// Remove one feedback entry, reconciling the reply into the cache.
    pub async fn remove_entry(
        &mut self,
        section: &SectionId,
        kind: EntryKind,
        entry: &EntryId,
    ) -> Result<(), AppError> {
        let token = self.require_token()?;
        self.loading.begin(RequestCategory::Write);
        let result = self.gateway.delete_entry(&token, section, kind, entry).await;
        self.loading.settle(RequestCategory::Write);

        let updated = result.inspect_err(|err| {
            self.write_error = Some(surface_message(err, "Delete failed"));
        })?;
        self.registry.reconcile(&updated);
        self.write_error = None;
        Ok(())
    }

    /// Download the aggregate PDF report with a derived filename.
    pub async fn download_report(
        &mut self,
        for_user: Option<&UserId>,
    ) -> Result<(String, ReportDocument), AppError> {
        let token = self.require_token()?;
        self.loading.begin(RequestCategory::Fetch);
        let result = self.gateway.download_report(&token, for_user.cloned()).await;
        self.loading.settle(RequestCategory::Fetch);

        let document = result.inspect_err(|err| {
            self.fetch_error = Some(surface_message(err, "Download failed"));
        })?;
        let filename = report_filename(for_user, self.clock.utc().date_naive());
        debug!(filename = %filename, bytes = document.bytes.len(), "report downloaded");
        Ok((filename, document))
    }
}
