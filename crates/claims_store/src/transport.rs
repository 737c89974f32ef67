//! Inbound page-fetch results from the transport layer

use serde::{Deserialize, Serialize};

use domain_claims::Claim;

/// A page of claims as returned by the claims endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageFetchResult {
    pub items: Vec<Claim>,
    /// Server-side match count
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub size: u32,
    /// Issue order of the request that produced this result. Results that are
    /// not newer than the last applied one are discarded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u64>,
}

impl PageFetchResult {
    pub fn new(items: Vec<Claim>) -> Self {
        let total = items.len() as u64;
        let size = items.len() as u32;
        Self {
            items,
            total,
            page: 1,
            size,
            sequence: None,
        }
    }

    pub fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = Some(sequence);
        self
    }
}

/// Result of `ClaimsStore::load_page`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// Discarded because a newer result was already applied
    Stale { sequence: u64, latest: u64 },
}
