//! Canonical claim collection
//!
//! Claims keyed by id, plus a tracking-number index that keeps tracking
//! numbers unique. `revision` increases on every change so derived views can
//! tell whether they are current.

use std::collections::HashMap;

use core_kernel::ClaimId;
use domain_claims::Claim;

use crate::error::StoreError;

#[derive(Debug, Default)]
pub struct ClaimCollection {
    claims: HashMap<ClaimId, Claim>,
    by_tracking: HashMap<String, ClaimId>,
    revision: u64,
}

impl ClaimCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole collection.
    ///
    /// The new set is fully validated before anything is swapped in; on error
    /// the previous contents stay untouched. Tracking numbers are stored
    /// trimmed, the same form live updates are matched in.
    pub fn replace(&mut self, claims: Vec<Claim>) -> Result<(), StoreError> {
        let mut by_id = HashMap::with_capacity(claims.len());
        let mut by_tracking = HashMap::with_capacity(claims.len());

        for mut claim in claims {
            claim.normalize_tracking_number();
            claim.validate().map_err(|source| StoreError::InvalidClaim {
                claim_id: claim.id.clone(),
                source,
            })?;
            if let Some(tracking_number) = &claim.tracking_number {
                if let Some(first) = by_tracking.insert(tracking_number.clone(), claim.id.clone()) {
                    return Err(StoreError::DuplicateTrackingNumber {
                        tracking_number: tracking_number.clone(),
                        first,
                        second: claim.id.clone(),
                    });
                }
            }
            let id = claim.id.clone();
            if by_id.insert(id.clone(), claim).is_some() {
                return Err(StoreError::DuplicateClaimId(id));
            }
        }

        self.claims = by_id;
        self.by_tracking = by_tracking;
        self.revision += 1;
        Ok(())
    }

    /// Stores an updated image of a claim that is already present.
    ///
    /// Callers validate the image first; tracking-number uniqueness is
    /// checked through `tracking_owner`.
    pub(crate) fn commit(&mut self, claim: Claim) {
        if let Some(tracking_number) = &claim.tracking_number {
            self.by_tracking
                .insert(tracking_number.clone(), claim.id.clone());
        }
        self.claims.insert(claim.id.clone(), claim);
        self.revision += 1;
    }

    pub fn get(&self, id: &ClaimId) -> Option<&Claim> {
        self.claims.get(id)
    }

    pub fn contains(&self, id: &ClaimId) -> bool {
        self.claims.contains_key(id)
    }

    /// The claim currently holding `tracking_number`
    pub fn tracking_owner(&self, tracking_number: &str) -> Option<&ClaimId> {
        self.by_tracking.get(tracking_number)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Claim> {
        self.claims.values()
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}
