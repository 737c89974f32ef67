//! Claims store errors

use thiserror::Error;

use core_kernel::ClaimId;
use domain_claims::ClaimError;

use crate::update::ClaimField;

/// Reasons an update event or explicit mutation is rejected.
///
/// A rejected update never mutates the stored claim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    #[error("Unknown claim field: {0}")]
    UnknownField(String),

    #[error("Field {0} is listed in updated_fields but carries no value")]
    MissingValue(ClaimField),

    #[error("Update rejected for claim {claim_id}: {source}")]
    Rejected {
        claim_id: ClaimId,
        #[source]
        source: ClaimError,
    },

    #[error("Tracking number {tracking_number} already belongs to claim {owner}")]
    DuplicateTrackingNumber {
        tracking_number: String,
        owner: ClaimId,
    },
}

/// Errors raised by store operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Duplicate claim id in replacement set: {0}")]
    DuplicateClaimId(ClaimId),

    #[error("Tracking number {tracking_number} is used by both {first} and {second}")]
    DuplicateTrackingNumber {
        tracking_number: String,
        first: ClaimId,
        second: ClaimId,
    },

    #[error("Claim {claim_id} is invalid: {source}")]
    InvalidClaim {
        claim_id: ClaimId,
        #[source]
        source: ClaimError,
    },

    #[error("Page size {requested} is outside 1..={max}")]
    InvalidPageSize { requested: usize, max: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
