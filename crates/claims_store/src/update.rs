//! Partial update events from the push channel
//!
//! `ClaimUpdateEvent` is the wire shape. Its `updated_fields` list is parsed
//! against the closed `ClaimField` set before anything is merged, producing a
//! `ClaimPatch` that carries exactly the named changes.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::ClaimId;
use domain_claims::{ClaimStatus, LineItem, Priority};

use crate::error::ReconcileError;

/// Claim attributes a partial update may touch.
///
/// Declaration order is merge order: diagnosis codes merge before the
/// primary diagnosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimField {
    Status,
    TrackingNumber,
    Priority,
    TotalPaid,
    LineItems,
    DiagnosisCodes,
    PrimaryDiagnosis,
}

impl ClaimField {
    pub fn as_str(self) -> &'static str {
        match self {
            ClaimField::Status => "status",
            ClaimField::TrackingNumber => "tracking_number",
            ClaimField::Priority => "priority",
            ClaimField::TotalPaid => "total_paid",
            ClaimField::LineItems => "line_items",
            ClaimField::DiagnosisCodes => "diagnosis_codes",
            ClaimField::PrimaryDiagnosis => "primary_diagnosis",
        }
    }
}

impl fmt::Display for ClaimField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimField {
    type Err = ReconcileError;

    /// Accepts snake_case and the camelCase names the portal front end sends
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "status" => Ok(ClaimField::Status),
            "tracking_number" | "trackingNumber" => Ok(ClaimField::TrackingNumber),
            "priority" => Ok(ClaimField::Priority),
            "total_paid" | "totalPaid" => Ok(ClaimField::TotalPaid),
            "line_items" | "lineItems" => Ok(ClaimField::LineItems),
            "diagnosis_codes" | "diagnosisCodes" => Ok(ClaimField::DiagnosisCodes),
            "primary_diagnosis" | "primaryDiagnosis" => Ok(ClaimField::PrimaryDiagnosis),
            other => Err(ReconcileError::UnknownField(other.to_string())),
        }
    }
}

/// Update event as delivered by the push channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimUpdateEvent {
    pub claim_id: ClaimId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ClaimStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// Amount in the claim's currency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_paid: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_items: Option<Vec<LineItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosis_codes: Option<Vec<String>>,
    /// When named in `updated_fields` without a value, clears the primary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_diagnosis: Option<String>,
    /// Server time of the change, used to discard out-of-date events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurred_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_fields: Vec<String>,
}

impl ClaimUpdateEvent {
    /// An event carrying only a status change
    pub fn status(claim_id: ClaimId, status: ClaimStatus) -> Self {
        Self {
            claim_id,
            status: Some(status),
            tracking_number: None,
            priority: None,
            total_paid: None,
            line_items: None,
            diagnosis_codes: None,
            primary_diagnosis: None,
            occurred_at: None,
            updated_fields: vec![ClaimField::Status.to_string()],
        }
    }

    pub fn at(mut self, occurred_at: DateTime<Utc>) -> Self {
        self.occurred_at = Some(occurred_at);
        self
    }

    /// Validates `updated_fields` and pairs each named field with its value
    pub fn into_patch(self) -> Result<ClaimPatch, ReconcileError> {
        let fields = self
            .updated_fields
            .iter()
            .map(|name| name.parse::<ClaimField>())
            .collect::<Result<BTreeSet<_>, _>>()?;

        let mut event = self;
        let mut changes = Vec::with_capacity(fields.len());
        for field in fields {
            let change = match field {
                ClaimField::Status => event.status.take().map(FieldChange::Status),
                ClaimField::TrackingNumber => {
                    event.tracking_number.take().map(FieldChange::TrackingNumber)
                }
                ClaimField::Priority => event.priority.take().map(FieldChange::Priority),
                ClaimField::TotalPaid => event.total_paid.take().map(FieldChange::TotalPaid),
                ClaimField::LineItems => event.line_items.take().map(FieldChange::LineItems),
                ClaimField::DiagnosisCodes => {
                    event.diagnosis_codes.take().map(FieldChange::DiagnosisCodes)
                }
                ClaimField::PrimaryDiagnosis => {
                    Some(FieldChange::PrimaryDiagnosis(event.primary_diagnosis.take()))
                }
            };
            changes.push(change.ok_or(ReconcileError::MissingValue(field))?);
        }

        Ok(ClaimPatch {
            claim_id: event.claim_id,
            occurred_at: event.occurred_at,
            changes,
        })
    }
}

/// One validated field change
#[derive(Debug, Clone, PartialEq)]
pub enum FieldChange {
    Status(ClaimStatus),
    TrackingNumber(String),
    Priority(Priority),
    TotalPaid(Decimal),
    LineItems(Vec<LineItem>),
    DiagnosisCodes(Vec<String>),
    PrimaryDiagnosis(Option<String>),
}

impl FieldChange {
    pub fn field(&self) -> ClaimField {
        match self {
            FieldChange::Status(_) => ClaimField::Status,
            FieldChange::TrackingNumber(_) => ClaimField::TrackingNumber,
            FieldChange::Priority(_) => ClaimField::Priority,
            FieldChange::TotalPaid(_) => ClaimField::TotalPaid,
            FieldChange::LineItems(_) => ClaimField::LineItems,
            FieldChange::DiagnosisCodes(_) => ClaimField::DiagnosisCodes,
            FieldChange::PrimaryDiagnosis(_) => ClaimField::PrimaryDiagnosis,
        }
    }
}

/// A validated partial update, changes in merge order
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimPatch {
    pub claim_id: ClaimId,
    pub occurred_at: Option<DateTime<Utc>>,
    pub changes: Vec<FieldChange>,
}

impl ClaimPatch {
    /// A patch changing only the status, used by explicit store mutations
    pub fn status(claim_id: ClaimId, status: ClaimStatus) -> Self {
        Self {
            claim_id,
            occurred_at: None,
            changes: vec![FieldChange::Status(status)],
        }
    }

    pub fn fields(&self) -> Vec<ClaimField> {
        self.changes.iter().map(FieldChange::field).collect()
    }

    /// The primary diagnosis this patch sets, if it names that field
    pub(crate) fn primary_override(&self) -> Option<Option<&str>> {
        self.changes.iter().find_map(|change| match change {
            FieldChange::PrimaryDiagnosis(primary) => Some(primary.as_deref()),
            _ => None,
        })
    }
}
