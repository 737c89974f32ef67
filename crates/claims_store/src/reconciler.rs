//! Live update reconciler
//!
//! Applies validated patches to claims already in the collection. A patch is
//! merged into a copy of the claim; the copy replaces the stored claim only
//! if every change in the patch is accepted. Unknown claims are ignored and
//! re-applying a patch that is already reflected changes nothing.

use chrono::Utc;

use core_kernel::Money;
use domain_claims::{Claim, DiagnosisCodes};

use crate::collection::ClaimCollection;
use crate::error::ReconcileError;
use crate::update::{ClaimField, ClaimPatch, ClaimUpdateEvent, FieldChange};

/// What applying a patch did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The claim changed; `fields` lists what actually differed
    Applied { fields: Vec<ClaimField> },
    /// Every named field already held the patched value
    Unchanged,
    /// No claim with that id; benign race with a full replace
    NotFound,
    /// The event predates the claim's last update
    Stale,
}

impl ReconcileOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ReconcileOutcome::Applied { .. })
    }
}

/// Running totals, by outcome
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub applied: u64,
    pub unchanged: u64,
    pub not_found: u64,
    pub stale: u64,
    pub rejected: u64,
}

#[derive(Debug, Default)]
pub struct Reconciler {
    stats: ReconcileStats,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> ReconcileStats {
        self.stats
    }

    /// Applies `patch` to the collection
    pub fn apply(
        &mut self,
        collection: &mut ClaimCollection,
        patch: &ClaimPatch,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        let result = Self::merge(collection, patch);
        self.record(&result);
        result
    }

    /// Parses and applies a push-channel event.
    ///
    /// Events for unknown claims are ignored before their field list is
    /// checked, so a malformed event for such a claim is not a rejection.
    pub fn apply_event(
        &mut self,
        collection: &mut ClaimCollection,
        event: ClaimUpdateEvent,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        let result = if collection.contains(&event.claim_id) {
            event
                .into_patch()
                .and_then(|patch| Self::merge(collection, &patch))
        } else {
            Ok(ReconcileOutcome::NotFound)
        };
        self.record(&result);
        result
    }

    fn record(&mut self, result: &Result<ReconcileOutcome, ReconcileError>) {
        match result {
            Ok(ReconcileOutcome::Applied { .. }) => self.stats.applied += 1,
            Ok(ReconcileOutcome::Unchanged) => self.stats.unchanged += 1,
            Ok(ReconcileOutcome::NotFound) => self.stats.not_found += 1,
            Ok(ReconcileOutcome::Stale) => self.stats.stale += 1,
            Err(_) => self.stats.rejected += 1,
        }
    }

    fn merge(
        collection: &mut ClaimCollection,
        patch: &ClaimPatch,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        let Some(current) = collection.get(&patch.claim_id) else {
            return Ok(ReconcileOutcome::NotFound);
        };
        if let Some(occurred_at) = patch.occurred_at {
            if occurred_at < current.updated_at {
                return Ok(ReconcileOutcome::Stale);
            }
        }

        let mut candidate = current.clone();
        let mut changed = Vec::new();
        for change in &patch.changes {
            if apply_change(collection, &mut candidate, change, patch)? {
                changed.push(change.field());
            }
        }

        if changed.is_empty() {
            return Ok(ReconcileOutcome::Unchanged);
        }
        candidate.updated_at = patch.occurred_at.unwrap_or_else(Utc::now);
        collection.commit(candidate);
        Ok(ReconcileOutcome::Applied { fields: changed })
    }
}

/// Merges one change into `candidate`; returns whether the value differed
fn apply_change(
    collection: &ClaimCollection,
    candidate: &mut Claim,
    change: &FieldChange,
    patch: &ClaimPatch,
) -> Result<bool, ReconcileError> {
    let rejected = |source| ReconcileError::Rejected {
        claim_id: patch.claim_id.clone(),
        source,
    };

    match change {
        FieldChange::Status(status) => candidate.transition_to(*status).map_err(rejected),
        FieldChange::TrackingNumber(tracking_number) => {
            if let Some(owner) = collection.tracking_owner(tracking_number.trim()) {
                if *owner != candidate.id {
                    return Err(ReconcileError::DuplicateTrackingNumber {
                        tracking_number: tracking_number.trim().to_string(),
                        owner: owner.clone(),
                    });
                }
            }
            candidate.assign_tracking_number(tracking_number).map_err(rejected)
        }
        FieldChange::Priority(priority) => Ok(replace(&mut candidate.priority, *priority)),
        FieldChange::TotalPaid(amount) => {
            let amount = Money::new(*amount, candidate.currency);
            if amount == candidate.total_paid {
                return Ok(false);
            }
            candidate.set_total_paid(amount).map_err(rejected)?;
            Ok(true)
        }
        FieldChange::LineItems(line_items) => {
            if candidate.line_items == *line_items {
                return Ok(false);
            }
            candidate.set_line_items(line_items.clone());
            candidate.total_charged().map_err(rejected)?;
            Ok(true)
        }
        FieldChange::DiagnosisCodes(codes) => {
            let primary = match patch.primary_override() {
                Some(primary) => primary.map(str::to_string),
                None => candidate.diagnoses.primary().map(str::to_string),
            };
            let diagnoses = DiagnosisCodes::new(codes, primary).map_err(rejected)?;
            Ok(replace(&mut candidate.diagnoses, diagnoses))
        }
        FieldChange::PrimaryDiagnosis(primary) => {
            candidate
                .diagnoses
                .set_primary(primary.as_deref())
                .map_err(rejected)?;
            // Compared against the stored claim, since a diagnosis-codes change
            // earlier in this patch may already have installed the new primary.
            let stored = collection
                .get(&candidate.id)
                .and_then(|claim| claim.diagnoses.primary());
            Ok(candidate.diagnoses.primary() != stored)
        }
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
