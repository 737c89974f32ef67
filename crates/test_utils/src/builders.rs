//! Test Data Builders
//!
//! Builds claims with sensible defaults so tests only spell out the fields
//! they care about.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use core_kernel::{ClaimId, Currency, MemberId, Money, PolicyId, ProviderId, ServicePeriod};
use domain_claims::{Claim, ClaimStatus, ClaimType, DiagnosisCodes, LineItem, Priority};

use crate::fixtures::TemporalFixtures;

/// Builder for constructing test claims
pub struct TestClaimBuilder {
    id: ClaimId,
    tracking_number: Option<String>,
    claim_type: ClaimType,
    status: ClaimStatus,
    priority: Priority,
    member_id: MemberId,
    service_period: ServicePeriod,
    diagnoses: DiagnosisCodes,
    line_items: Vec<LineItem>,
    total_paid: Decimal,
    appeal_exhausted: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Default for TestClaimBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestClaimBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        let created_at = TemporalFixtures::base_time();
        Self {
            id: ClaimId::new_v7(),
            tracking_number: None,
            claim_type: ClaimType::Professional,
            status: ClaimStatus::Submitted,
            priority: Priority::Normal,
            member_id: MemberId::new("MBR-0001").expect("fixture member id"),
            service_period: ServicePeriod::single_day(TemporalFixtures::service_date()),
            diagnoses: DiagnosisCodes::default(),
            line_items: Vec::new(),
            total_paid: Decimal::ZERO,
            appeal_exhausted: false,
            created_at,
            updated_at: created_at,
        }
    }

    /// Sets a server-style identifier such as `c1`
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = ClaimId::new(id).expect("test claim id must not be blank");
        self
    }

    pub fn with_tracking_number(mut self, tracking_number: impl Into<String>) -> Self {
        self.tracking_number = Some(tracking_number.into());
        self
    }

    pub fn with_claim_type(mut self, claim_type: ClaimType) -> Self {
        self.claim_type = claim_type;
        self
    }

    pub fn with_status(mut self, status: ClaimStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_member(mut self, member_id: &str) -> Self {
        self.member_id = MemberId::new(member_id).expect("test member id must not be blank");
        self
    }

    pub fn with_service_date(mut self, date: NaiveDate) -> Self {
        self.service_period = ServicePeriod::single_day(date);
        self
    }

    pub fn with_service_period(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.service_period = ServicePeriod::new(from, to).expect("test service period");
        self
    }

    pub fn with_diagnoses(mut self, codes: &[&str], primary: Option<&str>) -> Self {
        self.diagnoses = DiagnosisCodes::new(codes, primary.map(str::to_string))
            .expect("test diagnoses must be consistent");
        self
    }

    pub fn with_line_item(mut self, procedure_code: &str, quantity: u32, unit_price: Decimal) -> Self {
        self.line_items.push(
            LineItem::new(procedure_code, quantity, unit_price).expect("test line item charge fits"),
        );
        self
    }

    pub fn with_total_paid(mut self, amount: Decimal) -> Self {
        self.total_paid = amount;
        self
    }

    pub fn with_appeal_exhausted(mut self) -> Self {
        self.appeal_exhausted = true;
        self
    }

    /// Sets both timestamps
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = created_at;
        self
    }

    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = updated_at;
        self
    }

    pub fn build(self) -> Claim {
        Claim {
            id: self.id,
            tracking_number: self.tracking_number,
            claim_type: self.claim_type,
            status: self.status,
            priority: self.priority,
            policy_id: PolicyId::new("POL-TEST-0001").expect("fixture policy id"),
            member_id: self.member_id,
            provider_id: ProviderId::new("PRV-TEST-0001").expect("fixture provider id"),
            service_period: self.service_period,
            diagnoses: self.diagnoses,
            line_items: self.line_items,
            currency: Currency::USD,
            total_paid: Money::new(self.total_paid, Currency::USD),
            appeal_exhausted: self.appeal_exhausted,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
