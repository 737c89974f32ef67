//! Filter predicate engine
//!
//! A `FilterSpec` narrows the visible claim set. Every field is optional and
//! an absent field places no constraint on its dimension. Active dimensions
//! combine with AND.

use serde::{Deserialize, Serialize};

use core_kernel::DateRange;
use domain_claims::{Claim, ClaimStatus, ClaimType};

/// Structural query over the claim collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Case-insensitive substring of the tracking number or member id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ClaimStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim_type: Option<ClaimType>,
    /// Window the service start date must fall in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_dates: Option<DateRange>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn with_status(mut self, status: ClaimStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_claim_type(mut self, claim_type: ClaimType) -> Self {
        self.claim_type = Some(claim_type);
        self
    }

    pub fn with_service_dates(mut self, range: DateRange) -> Self {
        self.service_dates = Some(range);
        self
    }

    /// Number of dimensions that actually constrain the result
    pub fn active_dimensions(&self) -> usize {
        let compiled = CompiledFilter::new(self);
        [
            compiled.needle.is_some(),
            compiled.status.is_some(),
            compiled.claim_type.is_some(),
            compiled.service_dates.is_some(),
        ]
        .iter()
        .filter(|active| **active)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.active_dimensions() == 0
    }
}

/// Returns true when `claim` satisfies every constrained dimension of `spec`
pub fn matches(claim: &Claim, spec: &FilterSpec) -> bool {
    CompiledFilter::new(spec).matches(claim)
}

/// A `FilterSpec` normalized once for repeated evaluation
#[derive(Debug, Clone)]
pub(crate) struct CompiledFilter {
    needle: Option<String>,
    status: Option<ClaimStatus>,
    claim_type: Option<ClaimType>,
    service_dates: Option<DateRange>,
}

impl CompiledFilter {
    pub(crate) fn new(spec: &FilterSpec) -> Self {
        let needle = spec
            .search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase);

        Self {
            needle,
            status: spec.status,
            claim_type: spec.claim_type,
            service_dates: spec.service_dates.filter(|range| !range.is_unbounded()),
        }
    }

    pub(crate) fn matches(&self, claim: &Claim) -> bool {
        self.matches_text(claim)
            && self.status.map_or(true, |status| claim.status == status)
            && self.claim_type.map_or(true, |claim_type| claim.claim_type == claim_type)
            && self
                .service_dates
                .map_or(true, |range| range.contains(claim.service_period.from()))
    }

    fn matches_text(&self, claim: &Claim) -> bool {
        let Some(needle) = &self.needle else {
            return true;
        };
        let in_tracking = claim
            .tracking_number
            .as_deref()
            .map_or(false, |tracking| contains_ignore_case(tracking, needle));

        in_tracking || contains_ignore_case(claim.member_id.as_str(), needle)
    }
}

/// `needle` must already be lowercase
fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    if haystack.is_ascii() && needle.is_ascii() {
        let (haystack, needle) = (haystack.as_bytes(), needle.as_bytes());
        return haystack
            .windows(needle.len())
            .any(|window| window.eq_ignore_ascii_case(needle));
    }
    haystack.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_search_is_inactive() {
        let spec = FilterSpec::new().with_search("   ");
        assert_eq!(spec.active_dimensions(), 0);
        assert!(spec.is_empty());
    }

    #[test]
    fn test_unbounded_range_is_inactive() {
        let spec = FilterSpec::new().with_service_dates(DateRange::default());
        assert_eq!(spec.active_dimensions(), 0);
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("TRK-00AB12", "ab1"));
        assert!(!contains_ignore_case("TRK", "trk-1"));
        assert!(contains_ignore_case("MÜLLER-7", "müller"));
    }

    #[test]
    fn test_spec_json_omits_absent_fields() {
        let spec = FilterSpec::new().with_status(ClaimStatus::Approved);
        assert_eq!(serde_json::to_string(&spec).unwrap(), r#"{"status":"approved"}"#);
    }
}
