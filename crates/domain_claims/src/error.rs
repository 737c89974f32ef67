//! Claims domain errors

use rust_decimal::Decimal;
use thiserror::Error;

use core_kernel::MoneyError;

use crate::status::ClaimStatus;

/// Errors that can occur in the claims domain
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimError {
    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: ClaimStatus, to: ClaimStatus },

    #[error("Primary diagnosis {0} is not among the claim's diagnosis codes")]
    PrimaryDiagnosisNotListed(String),

    #[error("Diagnosis code must not be blank")]
    BlankDiagnosisCode,

    #[error("Tracking number must not be blank")]
    BlankTrackingNumber,

    #[error("Tracking number {current} cannot be reassigned to {requested}")]
    TrackingNumberReassigned { current: String, requested: String },

    #[error("Charge for {quantity} x {unit_price} overflows")]
    ChargeOverflow { quantity: u32, unit_price: Decimal },

    #[error(transparent)]
    Money(#[from] MoneyError),
}
