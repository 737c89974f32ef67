//! Strongly-typed identifiers for claims and the records they reference
//!
//! Identifiers are issued by the server and arrive as opaque strings, so the
//! newtypes wrap a `String` rather than a parsed UUID. Locally generated
//! identifiers use a prefixed, time-ordered UUID so that fixtures sort by
//! creation order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised when parsing an identifier
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("{0} identifier must not be blank")]
    Blank(&'static str),
}

macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new time-ordered identifier (`PREFIX-<uuid v7>`)
            pub fn new_v7() -> Self {
                Self(format!("{}-{}", $prefix, Uuid::now_v7()))
            }

            /// Wraps a server-issued identifier
            pub fn new(raw: impl Into<String>) -> Result<Self, IdentifierError> {
                let raw = raw.into();
                if raw.trim().is_empty() {
                    return Err(IdentifierError::Blank($prefix));
                }
                Ok(Self(raw))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns the identifier prefix used for generated values
            pub fn prefix() -> &'static str {
                $prefix
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdentifierError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdentifierError;

            fn try_from(raw: String) -> Result<Self, Self::Error> {
                Self::new(raw)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ClaimId, "CLM");
define_id!(PolicyId, "POL");
define_id!(MemberId, "MBR");
define_id!(ProviderId, "PRV");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_id_has_prefix() {
        let id = ClaimId::new_v7();
        assert!(id.to_string().starts_with("CLM-"));
    }

    #[test]
    fn test_server_ids_are_accepted_verbatim() {
        let id: ClaimId = "c1".parse().unwrap();
        assert_eq!(id.as_str(), "c1");
    }

    #[test]
    fn test_blank_id_is_rejected() {
        assert_eq!(MemberId::new("  "), Err(IdentifierError::Blank("MBR")));
    }
}
