//! Property-Based Test Generators
//!
//! Proptest strategies for claims that satisfy the entity invariants.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use domain_claims::{Claim, ClaimStatus, ClaimType, Priority};

use crate::builders::TestClaimBuilder;
use crate::fixtures::TemporalFixtures;

/// Strategy for generating claim statuses
pub fn claim_status_strategy() -> impl Strategy<Value = ClaimStatus> {
    proptest::sample::select(ClaimStatus::ALL.to_vec())
}

/// Strategy for generating claim types
pub fn claim_type_strategy() -> impl Strategy<Value = ClaimType> {
    prop_oneof![
        Just(ClaimType::Professional),
        Just(ClaimType::Institutional),
        Just(ClaimType::Dental),
        Just(ClaimType::Pharmacy),
    ]
}

pub fn priority_strategy() -> impl Strategy<Value = Priority> {
    prop_oneof![
        Just(Priority::Low),
        Just(Priority::Normal),
        Just(Priority::High),
        Just(Priority::Urgent),
    ]
}

/// Service dates within the first half of 2024
pub fn service_date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..180).prop_map(|days| TemporalFixtures::date(2024, 1, 1) + Duration::days(days))
}

/// Creation times within a week of the base time, minute resolution
pub fn created_at_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..10_080).prop_map(|minutes| TemporalFixtures::base_time() + Duration::minutes(minutes))
}

/// Unit prices between $0.01 and $5,000.00
pub fn unit_price_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..500_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// One claim with the given position-derived id and tracking number.
///
/// Few distinct members, statuses and dates so that ties and filter hits
/// are common.
pub fn claim_strategy(index: usize) -> impl Strategy<Value = Claim> {
    (
        claim_status_strategy(),
        claim_type_strategy(),
        priority_strategy(),
        service_date_strategy(),
        created_at_strategy(),
        0usize..8,
        proptest::collection::vec((1u32..5, unit_price_strategy()), 0..3),
        any::<bool>(),
    )
        .prop_map(
            move |(status, claim_type, priority, service_date, created_at, member, lines, tracked)| {
                let mut builder = TestClaimBuilder::new()
                    .with_id(&format!("c{:04}", index))
                    .with_status(status)
                    .with_claim_type(claim_type)
                    .with_priority(priority)
                    .with_member(&format!("MBR-{}", member))
                    .with_service_date(service_date)
                    .with_created_at(created_at);
                if tracked {
                    builder = builder.with_tracking_number(format!("TRK-{:04}", index));
                }
                for (position, (quantity, price)) in lines.into_iter().enumerate() {
                    builder = builder.with_line_item(&format!("9921{}", position), quantity, price);
                }
                builder.build()
            },
        )
}

/// Collections of up to `max` claims with unique ids and tracking numbers
pub fn claims_strategy(max: usize) -> impl Strategy<Value = Vec<Claim>> {
    (0..=max).prop_flat_map(|len| (0..len).map(claim_strategy).collect::<Vec<_>>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    proptest! {
        #[test]
        fn generated_claims_are_valid(claims in claims_strategy(20)) {
            for claim in &claims {
                prop_assert!(claim.validate().is_ok());
            }
        }

        #[test]
        fn generated_ids_are_unique(claims in claims_strategy(20)) {
            let ids: HashSet<_> = claims.iter().map(|claim| claim.id.clone()).collect();
            prop_assert_eq!(ids.len(), claims.len());
        }

        #[test]
        fn unit_prices_are_positive(price in unit_price_strategy()) {
            prop_assert!(price > Decimal::ZERO);
        }
    }
}
