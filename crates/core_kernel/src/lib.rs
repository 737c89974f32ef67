//! Core Kernel - Foundational types for the claims store
//!
//! This crate provides the value types every other crate type-checks against:
//! - Money types with precise decimal arithmetic
//! - Inclusive date ranges for service periods and filters
//! - Strongly-typed identifiers for claims and the records they reference

pub mod money;
pub mod temporal;
pub mod identifiers;

pub use money::{Money, Currency, MoneyError};
pub use temporal::{DateRange, ServicePeriod, TemporalError};
pub use identifiers::{ClaimId, PolicyId, MemberId, ProviderId, IdentifierError};
