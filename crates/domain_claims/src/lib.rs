//! Healthcare Claims Domain
//!
//! This crate defines the claim record held by the client-side claims store,
//! the pure charge calculations over it, and the status lifecycle.
//!
//! # Claim Lifecycle
//!
//! ```text
//! submitted -> validating -> processing -> pended -> in_review -> approved/denied
//!                                       -> approved -> paid
//!                                       -> denied -> appealed -> approved/denied
//! ```

pub mod claim;
pub mod status;
pub mod line_item;
pub mod diagnosis;
pub mod error;

pub use claim::{Claim, ClaimType, Priority, total_charged};
pub use status::ClaimStatus;
pub use line_item::{LineItem, charged_amount};
pub use diagnosis::DiagnosisCodes;
pub use error::ClaimError;
