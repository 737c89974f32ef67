//! Claims store
//!
//! The store owns the canonical collection and every piece of derived state
//! the list screens read: the active query, selection, loading and error
//! flags. Mutations are synchronous. Each one that changes state produces
//! exactly one notification, delivered after the mutation is complete.

use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use core_kernel::ClaimId;
use domain_claims::{Claim, ClaimError, ClaimStatus};

use crate::collection::ClaimCollection;
use crate::config::StoreConfig;
use crate::error::{ReconcileError, StoreError};
use crate::filter::{CompiledFilter, FilterSpec};
use crate::observer::{ChangeKind, ObserverId, ObserverRegistry, StoreChange, StoreObserver};
use crate::projection::{Page, ProjectionCache, ProjectionQuery, SortSpec};
use crate::reconciler::{ReconcileOutcome, ReconcileStats, Reconciler};
use crate::selection::SelectionTracker;
use crate::transport::{LoadOutcome, PageFetchResult};
use crate::update::{ClaimPatch, ClaimUpdateEvent};

/// An update event the store refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedUpdate {
    pub claim_id: ClaimId,
    pub error: ReconcileError,
    pub rejected_at: DateTime<Utc>,
}

/// Per-claim results of a bulk status change
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkStatusOutcome {
    pub updated: Vec<ClaimId>,
    pub unchanged: Vec<ClaimId>,
    pub rejected: Vec<(ClaimId, ClaimError)>,
}

#[derive(Debug)]
pub struct ClaimsStore {
    config: StoreConfig,
    collection: ClaimCollection,
    query: ProjectionQuery,
    projection: ProjectionCache,
    selection: SelectionTracker,
    reconciler: Reconciler,
    observers: ObserverRegistry,
    rejections: VecDeque<RejectedUpdate>,
    loading: bool,
    error: Option<String>,
    last_sequence: Option<u64>,
    server_total: Option<u64>,
}

impl Default for ClaimsStore {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ClaimsStore {
    /// Creates an empty store
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    /// Creates an empty store with the default configuration
    pub fn with_defaults() -> Self {
        Self::from_config(StoreConfig::default())
    }

    fn from_config(config: StoreConfig) -> Self {
        let mut query = ProjectionQuery::new(config.default_page_size);
        query.sort = config.default_sort();

        Self {
            rejections: VecDeque::with_capacity(config.rejection_log_capacity),
            config,
            collection: ClaimCollection::new(),
            query,
            projection: ProjectionCache::new(),
            selection: SelectionTracker::new(),
            reconciler: Reconciler::new(),
            observers: ObserverRegistry::default(),
            loading: false,
            error: None,
            last_sequence: None,
            server_total: None,
        }
    }

    // ------------------------------------------------------------------
    // Observers
    // ------------------------------------------------------------------

    pub fn subscribe(&mut self, observer: impl StoreObserver + 'static) -> ObserverId {
        self.observers.subscribe(Box::new(observer))
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    // ------------------------------------------------------------------
    // Collection
    // ------------------------------------------------------------------

    /// Replaces the whole collection.
    ///
    /// Clears the selection, returns to page 1, and clears the loading and
    /// error flags. An invalid set is rejected and leaves the store as it was.
    #[instrument(skip_all, fields(count = claims.len()))]
    pub fn set_claims(&mut self, claims: Vec<Claim>) -> Result<(), StoreError> {
        self.replace_claims(claims)?;
        self.server_total = None;
        self.notify(ChangeKind::ClaimsReplaced);
        Ok(())
    }

    /// Applies a transport page-fetch result.
    ///
    /// Sequenced results older than the last applied one are discarded.
    #[instrument(skip_all, fields(count = result.items.len(), sequence = ?result.sequence))]
    pub fn load_page(&mut self, result: PageFetchResult) -> Result<LoadOutcome, StoreError> {
        if let (Some(sequence), Some(latest)) = (result.sequence, self.last_sequence) {
            if sequence <= latest {
                warn!(sequence, latest, "discarding stale page-fetch result");
                return Ok(LoadOutcome::Stale { sequence, latest });
            }
        }

        self.replace_claims(result.items)?;
        if result.sequence.is_some() {
            self.last_sequence = result.sequence;
        }
        self.server_total = Some(result.total);
        self.notify(ChangeKind::ClaimsReplaced);
        Ok(LoadOutcome::Applied)
    }

    fn replace_claims(&mut self, claims: Vec<Claim>) -> Result<(), StoreError> {
        if let Err(error) = self.collection.replace(claims) {
            warn!(%error, "rejected claim replacement");
            return Err(error);
        }
        self.selection.clear();
        self.projection.invalidate();
        self.query.page_index = 1;
        self.loading = false;
        self.error = None;

        info!(
            claims = self.collection.len(),
            revision = self.collection.revision(),
            "claims replaced"
        );
        Ok(())
    }

    /// Applies a push-channel update event.
    ///
    /// Unknown claims and out-of-date events are ignored. Rejected events are
    /// returned as errors and also kept in `recent_rejections`; the claim is
    /// left unchanged.
    pub fn handle_claim_update(
        &mut self,
        event: ClaimUpdateEvent,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        let claim_id = event.claim_id.clone();
        let result = self.reconciler.apply_event(&mut self.collection, event);

        match &result {
            Ok(ReconcileOutcome::Applied { fields }) => {
                debug!(%claim_id, ?fields, "claim update applied");
                self.notify(ChangeKind::ClaimUpdated);
            }
            Ok(ReconcileOutcome::Unchanged) => {
                debug!(%claim_id, "claim update already reflected");
            }
            Ok(ReconcileOutcome::NotFound) => {
                debug!(%claim_id, "ignoring update for claim not in store");
            }
            Ok(ReconcileOutcome::Stale) => {
                warn!(%claim_id, "discarding out-of-date claim update");
            }
            Err(error) => {
                warn!(%claim_id, %error, "claim update rejected");
                self.record_rejection(claim_id, error.clone());
            }
        }
        result
    }

    /// Explicit single-claim status change
    pub fn update_claim_status(
        &mut self,
        claim_id: &ClaimId,
        status: ClaimStatus,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        let patch = ClaimPatch::status(claim_id.clone(), status);
        let outcome = self.reconciler.apply(&mut self.collection, &patch)?;
        if outcome.is_applied() {
            debug!(%claim_id, %status, "claim status updated");
            self.notify(ChangeKind::ClaimUpdated);
        }
        Ok(outcome)
    }

    /// Moves every live selected claim to `status`.
    ///
    /// Each claim is validated on its own; claims that cannot legally move
    /// are reported and left as they were. Observers hear about the batch once.
    pub fn bulk_update_status(&mut self, status: ClaimStatus) -> BulkStatusOutcome {
        let mut outcome = BulkStatusOutcome::default();

        for claim_id in self.selected() {
            let patch = ClaimPatch::status(claim_id.clone(), status);
            match self.reconciler.apply(&mut self.collection, &patch) {
                Ok(ReconcileOutcome::Applied { .. }) => outcome.updated.push(claim_id),
                Ok(_) => outcome.unchanged.push(claim_id),
                Err(ReconcileError::Rejected { source, .. }) => {
                    outcome.rejected.push((claim_id, source))
                }
                Err(error) => warn!(%claim_id, %error, "unexpected bulk status error"),
            }
        }

        info!(
            %status,
            updated = outcome.updated.len(),
            rejected = outcome.rejected.len(),
            "bulk status update"
        );
        if !outcome.updated.is_empty() {
            self.notify(ChangeKind::ClaimsBulkUpdated);
        }
        outcome
    }

    fn record_rejection(&mut self, claim_id: ClaimId, error: ReconcileError) {
        let capacity = self.config.rejection_log_capacity;
        if capacity == 0 {
            return;
        }
        while self.rejections.len() >= capacity {
            self.rejections.pop_front();
        }
        self.rejections.push_back(RejectedUpdate {
            claim_id,
            error,
            rejected_at: Utc::now(),
        });
    }

    /// Rejected update events, oldest first
    pub fn recent_rejections(&self) -> impl Iterator<Item = &RejectedUpdate> {
        self.rejections.iter()
    }

    pub fn reconcile_stats(&self) -> ReconcileStats {
        self.reconciler.stats()
    }

    // ------------------------------------------------------------------
    // Query
    // ------------------------------------------------------------------

    /// Sets the filter and returns to page 1
    pub fn set_filters(&mut self, filter: FilterSpec) {
        if self.query.filter == filter && self.query.page_index == 1 {
            return;
        }
        debug!(?filter, "filters changed");
        self.query.filter = filter;
        self.query.page_index = 1;
        self.notify(ChangeKind::FiltersChanged);
    }

    /// Sets the ordering and returns to page 1
    pub fn set_sort(&mut self, sort: SortSpec) {
        if self.query.sort == sort && self.query.page_index == 1 {
            return;
        }
        debug!(?sort, "sort changed");
        self.query.sort = sort;
        self.query.page_index = 1;
        self.notify(ChangeKind::SortChanged);
    }

    /// Moves to a 1-based page, clamped to the pages that exist
    pub fn set_page(&mut self, page_index: usize) {
        let page_index = page_index.clamp(1, self.page_count());
        if self.query.page_index == page_index {
            return;
        }
        debug!(page_index, "page changed");
        self.query.page_index = page_index;
        self.notify(ChangeKind::PageChanged);
    }

    /// Changes the page size and returns to page 1
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), StoreError> {
        let max = self.config.max_page_size;
        if page_size == 0 || page_size > max {
            return Err(StoreError::InvalidPageSize {
                requested: page_size,
                max,
            });
        }
        if self.query.page_size == page_size && self.query.page_index == 1 {
            return Ok(());
        }
        debug!(page_size, "page size changed");
        self.query.page_size = page_size;
        self.query.page_index = 1;
        self.notify(ChangeKind::PageSizeChanged);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Returns true if the claim is now selected
    pub fn toggle_selection(&mut self, claim_id: ClaimId) -> bool {
        let selected = self.selection.toggle(claim_id);
        self.notify(ChangeKind::SelectionChanged);
        selected
    }

    /// Selects every claim on the current page
    pub fn select_all_visible(&mut self) -> usize {
        let ids = self.page().ids();
        self.select_ids(ids)
    }

    /// Selects every claim matching the active filter, across all pages
    pub fn select_all_filtered(&mut self) -> usize {
        let filter = CompiledFilter::new(&self.query.filter);
        let ids: Vec<ClaimId> = self
            .collection
            .iter()
            .filter(|claim| filter.matches(claim))
            .map(|claim| claim.id.clone())
            .collect();
        self.select_ids(ids)
    }

    fn select_ids(&mut self, ids: Vec<ClaimId>) -> usize {
        let added = self.selection.select_all(ids);
        if added > 0 {
            self.notify(ChangeKind::SelectionChanged);
        }
        added
    }

    pub fn clear_selection(&mut self) {
        if self.selection.tracked_len() == 0 {
            return;
        }
        self.selection.clear();
        self.notify(ChangeKind::SelectionChanged);
    }

    // ------------------------------------------------------------------
    // Flags
    // ------------------------------------------------------------------

    pub fn set_loading(&mut self, loading: bool) {
        if self.loading == loading {
            return;
        }
        self.loading = loading;
        self.notify(ChangeKind::LoadingChanged);
    }

    /// Records an upstream failure; the held claims stay visible
    pub fn set_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(error = %message, "upstream error reported");
        self.error = Some(message);
        self.loading = false;
        self.notify(ChangeKind::ErrorChanged);
    }

    pub fn clear_error(&mut self) {
        if self.error.take().is_some() {
            self.notify(ChangeKind::ErrorChanged);
        }
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// The visible page, recomputed only when its inputs changed
    pub fn page(&self) -> Arc<Page> {
        self.projection
            .page(self.collection.revision(), &self.query, self.collection.iter())
    }

    pub fn filters(&self) -> &FilterSpec {
        &self.query.filter
    }

    pub fn sort(&self) -> SortSpec {
        self.query.sort
    }

    pub fn page_size(&self) -> usize {
        self.query.page_size
    }

    /// 1-based index of the visible page
    pub fn current_page(&self) -> usize {
        self.page().page_index()
    }

    /// Claims matching the active filter
    pub fn total_count(&self) -> usize {
        self.page().total_count()
    }

    pub fn page_count(&self) -> usize {
        self.page().page_count()
    }

    /// Match count reported by the server with the last loaded page
    pub fn server_total(&self) -> Option<u64> {
        self.server_total
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Selected claims still present in the collection
    pub fn selected(&self) -> BTreeSet<ClaimId> {
        self.selection.selected(|id| self.collection.contains(id))
    }

    pub fn selected_count(&self) -> usize {
        self.selection.count(|id| self.collection.contains(id))
    }

    pub fn is_selected(&self, claim_id: &ClaimId) -> bool {
        self.selection
            .is_selected(claim_id, |id| self.collection.contains(id))
    }

    /// A copy of one claim
    pub fn claim(&self, claim_id: &ClaimId) -> Option<Claim> {
        self.collection.get(claim_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.collection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.collection.revision()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Number of times the visible page has been recomputed
    pub fn projection_computations(&self) -> u64 {
        self.projection.computations()
    }

    fn notify(&mut self, kind: ChangeKind) {
        if self.observers.is_empty() {
            return;
        }
        let change = StoreChange {
            kind,
            revision: self.collection.revision(),
            page: self.page(),
            selected_count: self.selected_count(),
            loading: self.loading,
            error: self.error.clone(),
        };
        self.observers.notify(&change);
    }
}
