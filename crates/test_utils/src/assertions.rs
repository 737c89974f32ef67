//! Custom Test Assertions
//!
//! Assertion helpers for claim invariants that give more meaningful failure
//! messages than plain `assert!`.

use rust_decimal::Decimal;

use domain_claims::{Claim, ClaimStatus};

/// Asserts that every line item's charged amount equals quantity × unit price
///
/// # Panics
///
/// Panics naming the first inconsistent line item
pub fn assert_charged_amounts_consistent(claim: &Claim) {
    for (position, item) in claim.line_items.iter().enumerate() {
        let expected = item.unit_price() * Decimal::from(item.quantity());
        assert_eq!(
            item.charged_amount(),
            expected,
            "Claim {} line {} ({}): charged {} != {} x {}",
            claim.id,
            position,
            item.procedure_code(),
            item.charged_amount(),
            item.quantity(),
            item.unit_price()
        );
    }

    let sum: Decimal = claim.line_items.iter().map(|item| item.charged_amount()).sum();
    assert_eq!(
        claim.total_charged().expect("total charged fits").amount(),
        sum,
        "Claim {} total charged does not equal the sum of its lines",
        claim.id
    );
}

/// Asserts the claims carry exactly these ids, in this order
pub fn assert_ids_in_order(claims: &[Claim], expected: &[&str]) {
    let actual: Vec<&str> = claims.iter().map(|claim| claim.id.as_str()).collect();
    assert_eq!(actual, expected, "Claim ids differ from expected order");
}

/// Asserts a claim's status
pub fn assert_status(claim: &Claim, expected: ClaimStatus) {
    assert_eq!(
        claim.status, expected,
        "Claim {} has status {}, expected {}",
        claim.id, claim.status, expected
    );
}

/// Asserts that no two claims share an id
pub fn assert_unique_ids(claims: &[Claim]) {
    let mut ids: Vec<&str> = claims.iter().map(|claim| claim.id.as_str()).collect();
    ids.sort_unstable();
    let before = ids.len();
    ids.dedup();
    assert_eq!(before, ids.len(), "Duplicate claim ids in collection");
}
