//! Claim record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, Currency, MemberId, Money, PolicyId, ProviderId, ServicePeriod};
use crate::diagnosis::DiagnosisCodes;
use crate::error::ClaimError;
use crate::line_item::LineItem;
use crate::status::ClaimStatus;

/// Claim form type
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimType {
    Professional,
    Institutional,
    Dental,
    Pharmacy,
}

/// Work-queue priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

/// A healthcare claim as held by the client
///
/// Policy, member, and provider are referenced by identifier only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    /// Unique identifier, never reassigned
    pub id: ClaimId,
    /// Human-facing tracking number, immutable once assigned
    #[serde(default)]
    pub tracking_number: Option<String>,
    pub claim_type: ClaimType,
    pub status: ClaimStatus,
    #[serde(default)]
    pub priority: Priority,
    pub policy_id: PolicyId,
    pub member_id: MemberId,
    pub provider_id: ProviderId,
    pub service_period: ServicePeriod,
    #[serde(default)]
    pub diagnoses: DiagnosisCodes,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    #[serde(default)]
    pub currency: Currency,
    pub total_paid: Money,
    /// Set once an appeal has been denied; the denial is then final
    #[serde(default)]
    pub appeal_exhausted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Sums the charged amounts of every line item
pub fn total_charged(claim: &Claim) -> Result<Money, ClaimError> {
    Money::total(claim.line_items.iter().map(LineItem::charged_amount), claim.currency)
        .map_err(ClaimError::from)
}

impl Claim {
    /// Creates a newly submitted claim with no lines or diagnoses
    pub fn submitted(
        claim_type: ClaimType,
        policy_id: PolicyId,
        member_id: MemberId,
        provider_id: ProviderId,
        service_period: ServicePeriod,
        currency: Currency,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: ClaimId::new_v7(),
            tracking_number: None,
            claim_type,
            status: ClaimStatus::Submitted,
            priority: Priority::Normal,
            policy_id,
            member_id,
            provider_id,
            service_period,
            diagnoses: DiagnosisCodes::default(),
            line_items: Vec::new(),
            currency,
            total_paid: Money::zero(currency),
            appeal_exhausted: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn total_charged(&self) -> Result<Money, ClaimError> {
        total_charged(self)
    }

    /// Checks whether `next` is a legal successor given this claim's history
    pub fn can_transition_to(&self, next: ClaimStatus) -> bool {
        if self.status == ClaimStatus::Denied && next == ClaimStatus::Appealed && self.appeal_exhausted {
            return false;
        }
        self.status.can_transition_to(next)
    }

    /// True when no further status change is possible
    pub fn is_final(&self) -> bool {
        self.status.is_terminal() || (self.status == ClaimStatus::Denied && self.appeal_exhausted)
    }

    /// Applies a status change without touching `updated_at`.
    ///
    /// Re-applying the current status succeeds and reports no change.
    pub fn transition_to(&mut self, next: ClaimStatus) -> Result<bool, ClaimError> {
        if next == self.status {
            return Ok(false);
        }
        if !self.can_transition_to(next) {
            return Err(ClaimError::InvalidStatusTransition {
                from: self.status,
                to: next,
            });
        }
        if self.status == ClaimStatus::Appealed && next == ClaimStatus::Denied {
            self.appeal_exhausted = true;
        }
        self.status = next;
        Ok(true)
    }

    /// Updates the status and stamps `updated_at` when it changed
    pub fn update_status(&mut self, next: ClaimStatus) -> Result<(), ClaimError> {
        if self.transition_to(next)? {
            self.updated_at = Utc::now();
        }
        Ok(())
    }

    /// Assigns the tracking number; an assigned number may only be re-sent unchanged
    pub fn assign_tracking_number(&mut self, tracking_number: &str) -> Result<bool, ClaimError> {
        let tracking_number = tracking_number.trim();
        if tracking_number.is_empty() {
            return Err(ClaimError::BlankTrackingNumber);
        }
        match &self.tracking_number {
            Some(current) if current == tracking_number => Ok(false),
            Some(current) => Err(ClaimError::TrackingNumberReassigned {
                current: current.clone(),
                requested: tracking_number.to_string(),
            }),
            None => {
                self.tracking_number = Some(tracking_number.to_string());
                Ok(true)
            }
        }
    }

    /// Records the paid total, which must be in the claim currency
    pub fn set_total_paid(&mut self, amount: Money) -> Result<(), ClaimError> {
        self.ensure_currency(&amount)?;
        self.total_paid = amount;
        Ok(())
    }

    /// Replaces every line item
    pub fn set_line_items(&mut self, line_items: Vec<LineItem>) {
        self.line_items = line_items;
    }

    pub fn add_line_item(&mut self, line_item: LineItem) {
        self.line_items.push(line_item);
    }

    /// Trims surrounding whitespace from the tracking number
    pub fn normalize_tracking_number(&mut self) {
        if let Some(tracking_number) = &mut self.tracking_number {
            let trimmed = tracking_number.trim();
            if trimmed.len() != tracking_number.len() {
                *tracking_number = trimmed.to_string();
            }
        }
    }

    /// Checks the invariants a claim must satisfy before it enters a store
    pub fn validate(&self) -> Result<(), ClaimError> {
        if let Some(tracking_number) = &self.tracking_number {
            if tracking_number.trim().is_empty() {
                return Err(ClaimError::BlankTrackingNumber);
            }
        }
        self.total_charged()?;
        self.ensure_currency(&self.total_paid)
    }

    fn ensure_currency(&self, amount: &Money) -> Result<(), ClaimError> {
        amount.ensure_currency(self.currency).map_err(ClaimError::from)
    }
}
