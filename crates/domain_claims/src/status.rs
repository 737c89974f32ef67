//! Claim status lifecycle
//!
//! Transitions are driven from outside (push updates or explicit store
//! mutations). This module only answers whether a proposed next status is a
//! legal successor of the current one.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Claim status
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    /// Received from the submitter
    Submitted,
    /// Front-end edits and eligibility checks
    Validating,
    /// In adjudication
    Processing,
    /// Held for manual review
    Pended,
    /// Manual review in progress
    InReview,
    /// Approved for payment
    Approved,
    /// Denied
    Denied,
    /// Denial under appeal
    Appealed,
    /// Paid
    Paid,
}

impl ClaimStatus {
    pub const ALL: [ClaimStatus; 9] = [
        ClaimStatus::Submitted,
        ClaimStatus::Validating,
        ClaimStatus::Processing,
        ClaimStatus::Pended,
        ClaimStatus::InReview,
        ClaimStatus::Approved,
        ClaimStatus::Denied,
        ClaimStatus::Appealed,
        ClaimStatus::Paid,
    ];

    /// Statuses reachable in one step
    pub fn successors(self) -> &'static [ClaimStatus] {
        use ClaimStatus::*;
        match self {
            // Claims that need no front-end edits go straight to adjudication.
            Submitted => &[Validating, Processing],
            Validating => &[Processing],
            Processing => &[Pended, Approved, Denied],
            Pended => &[InReview],
            InReview => &[Approved, Denied],
            Approved => &[Paid],
            Denied => &[Appealed],
            Appealed => &[Approved, Denied],
            Paid => &[],
        }
    }

    /// Checks whether `next` is a legal one-step successor.
    ///
    /// This is the edge check only. Whether a denial may still be appealed
    /// depends on the claim's history, see `Claim::can_transition_to`.
    pub fn can_transition_to(self, next: ClaimStatus) -> bool {
        self.successors().contains(&next)
    }

    /// `paid` is always terminal; `denied` becomes terminal once its appeal is spent
    pub fn is_terminal(self) -> bool {
        matches!(self, ClaimStatus::Paid)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ClaimStatus::Submitted => "submitted",
            ClaimStatus::Validating => "validating",
            ClaimStatus::Processing => "processing",
            ClaimStatus::Pended => "pended",
            ClaimStatus::InReview => "in_review",
            ClaimStatus::Approved => "approved",
            ClaimStatus::Denied => "denied",
            ClaimStatus::Appealed => "appealed",
            ClaimStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_path_is_legal() {
        assert!(ClaimStatus::Submitted.can_transition_to(ClaimStatus::Validating));
        assert!(ClaimStatus::Submitted.can_transition_to(ClaimStatus::Processing));
        assert!(ClaimStatus::Validating.can_transition_to(ClaimStatus::Processing));
        assert!(ClaimStatus::Processing.can_transition_to(ClaimStatus::Pended));
        assert!(ClaimStatus::Approved.can_transition_to(ClaimStatus::Paid));
    }

    #[test]
    fn test_backward_moves_are_illegal() {
        assert!(!ClaimStatus::Processing.can_transition_to(ClaimStatus::Submitted));
        assert!(!ClaimStatus::Paid.can_transition_to(ClaimStatus::Approved));
        assert!(!ClaimStatus::InReview.can_transition_to(ClaimStatus::Pended));
    }

    #[test]
    fn test_paid_has_no_successors() {
        assert!(ClaimStatus::Paid.successors().is_empty());
        assert!(ClaimStatus::Paid.is_terminal());
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_string(&ClaimStatus::InReview).unwrap();
        assert_eq!(json, "\"in_review\"");
        for status in ClaimStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status));
        }
    }
}
