//! Pre-built Test Fixtures
//!
//! Consistent, predictable claims and collections for store tests.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use domain_claims::{Claim, ClaimStatus, ClaimType, Priority};

use crate::builders::TestClaimBuilder;

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Reference creation time (Jan 15, 2024 09:00 UTC)
    pub fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap()
    }

    /// Reference service date (Jan 10, 2024)
    pub fn service_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
    }

    pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }
}

/// Fixture for claim collections
pub struct ClaimFixtures;

impl ClaimFixtures {
    /// `c1` submitted and `c2` approved
    pub fn submitted_and_approved() -> Vec<Claim> {
        vec![
            TestClaimBuilder::new()
                .with_id("c1")
                .with_tracking_number("TRK-0001")
                .with_status(ClaimStatus::Submitted)
                .build(),
            TestClaimBuilder::new()
                .with_id("c2")
                .with_tracking_number("TRK-0002")
                .with_status(ClaimStatus::Approved)
                .build(),
        ]
    }

    /// `count` claims with ids `c00001..`, tracking numbers `TRK-00001..`,
    /// and creation times one minute apart in id order.
    ///
    /// Status, type, priority, member and service date cycle so filters
    /// have something to bite on.
    pub fn numbered(count: usize) -> Vec<Claim> {
        (1..=count).map(Self::numbered_claim).collect()
    }

    /// The `index`th claim of `numbered`
    pub fn numbered_claim(index: usize) -> Claim {
        const TYPES: [ClaimType; 4] = [
            ClaimType::Professional,
            ClaimType::Institutional,
            ClaimType::Dental,
            ClaimType::Pharmacy,
        ];
        const PRIORITIES: [Priority; 4] = [
            Priority::Low,
            Priority::Normal,
            Priority::High,
            Priority::Urgent,
        ];

        let status = ClaimStatus::ALL[index % ClaimStatus::ALL.len()];
        let service_date = TemporalFixtures::service_date() + Duration::days((index % 90) as i64);

        TestClaimBuilder::new()
            .with_id(&format!("c{:05}", index))
            .with_tracking_number(format!("TRK-{:05}", index))
            .with_status(status)
            .with_claim_type(TYPES[index % TYPES.len()])
            .with_priority(PRIORITIES[index % PRIORITIES.len()])
            .with_member(&format!("MBR-{:03}", index % 50))
            .with_service_date(service_date)
            .with_line_item("99213", 1 + (index % 3) as u32, dec!(75.00))
            .with_line_item("36415", 1, Decimal::new((index % 100) as i64 * 100 + 950, 2))
            .with_created_at(TemporalFixtures::base_time() + Duration::minutes(index as i64))
            .build()
    }
}
