//! Diagnosis codes attached to a claim

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::ClaimError;

/// A set of diagnosis codes with an optional primary
///
/// Codes are trimmed and upper-cased. The primary, when set, is always a
/// member of the set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DiagnosisRecord", into = "DiagnosisRecord")]
pub struct DiagnosisCodes {
    codes: BTreeSet<String>,
    primary: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct DiagnosisRecord {
    #[serde(default)]
    codes: Vec<String>,
    #[serde(default)]
    primary: Option<String>,
}

impl TryFrom<DiagnosisRecord> for DiagnosisCodes {
    type Error = ClaimError;

    fn try_from(record: DiagnosisRecord) -> Result<Self, Self::Error> {
        DiagnosisCodes::new(record.codes, record.primary)
    }
}

impl From<DiagnosisCodes> for DiagnosisRecord {
    fn from(diagnoses: DiagnosisCodes) -> Self {
        DiagnosisRecord {
            codes: diagnoses.codes.into_iter().collect(),
            primary: diagnoses.primary,
        }
    }
}

fn normalize(code: &str) -> Result<String, ClaimError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(ClaimError::BlankDiagnosisCode);
    }
    Ok(code.to_ascii_uppercase())
}

impl DiagnosisCodes {
    pub fn new<I, S>(codes: I, primary: Option<String>) -> Result<Self, ClaimError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let codes = codes
            .into_iter()
            .map(|code| normalize(code.as_ref()))
            .collect::<Result<BTreeSet<_>, _>>()?;
        let primary = primary.as_deref().map(normalize).transpose()?;

        if let Some(primary) = &primary {
            if !codes.contains(primary) {
                return Err(ClaimError::PrimaryDiagnosisNotListed(primary.clone()));
            }
        }
        Ok(Self { codes, primary })
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }

    pub fn primary(&self) -> Option<&str> {
        self.primary.as_deref()
    }

    pub fn contains(&self, code: &str) -> bool {
        normalize(code).map_or(false, |code| self.codes.contains(&code))
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Designates a listed code as primary, or clears the primary with `None`
    pub fn set_primary(&mut self, primary: Option<&str>) -> Result<(), ClaimError> {
        let primary = primary.map(normalize).transpose()?;
        if let Some(code) = &primary {
            if !self.codes.contains(code) {
                return Err(ClaimError::PrimaryDiagnosisNotListed(code.clone()));
            }
        }
        self.primary = primary;
        Ok(())
    }
}
