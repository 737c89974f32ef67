//! Test Utilities Crate
//!
//! Provides shared test infrastructure for the claims store test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built claims and collections
//! - `builders`: Builder for claims with sensible defaults
//! - `assertions`: Assertion helpers for claim invariants
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
