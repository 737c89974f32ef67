//! Date ranges for claim service periods and filter windows
//!
//! Both types are inclusive on each end. A `ServicePeriod` always has both
//! bounds; a `DateRange` is a query window where either bound may be open.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid period: start {start} must not be after end {end}")]
    InvalidPeriod { start: NaiveDate, end: NaiveDate },
}

/// The dates a claim's services were rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPeriod", into = "RawPeriod")]
pub struct ServicePeriod {
    from: NaiveDate,
    to: NaiveDate,
}

#[derive(Serialize, Deserialize)]
struct RawPeriod {
    from: NaiveDate,
    to: NaiveDate,
}

impl TryFrom<RawPeriod> for ServicePeriod {
    type Error = TemporalError;

    fn try_from(raw: RawPeriod) -> Result<Self, Self::Error> {
        ServicePeriod::new(raw.from, raw.to)
    }
}

impl From<ServicePeriod> for RawPeriod {
    fn from(period: ServicePeriod) -> Self {
        RawPeriod {
            from: period.from,
            to: period.to,
        }
    }
}

impl ServicePeriod {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, TemporalError> {
        if from > to {
            return Err(TemporalError::InvalidPeriod { start: from, end: to });
        }
        Ok(Self { from, to })
    }

    /// A single day of service
    pub fn single_day(date: NaiveDate) -> Self {
        Self { from: date, to: date }
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    /// Number of calendar days covered, counting both ends
    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }
}

/// An inclusive date window with optional bounds
///
/// A missing bound leaves that side open, so `DateRange::default()` contains
/// every date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRange", into = "RawRange")]
pub struct DateRange {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

#[derive(Serialize, Deserialize)]
struct RawRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    from: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    to: Option<NaiveDate>,
}

impl TryFrom<RawRange> for DateRange {
    type Error = TemporalError;

    fn try_from(raw: RawRange) -> Result<Self, Self::Error> {
        DateRange::new(raw.from, raw.to)
    }
}

impl From<DateRange> for RawRange {
    fn from(range: DateRange) -> Self {
        RawRange {
            from: range.from,
            to: range.to,
        }
    }
}

impl DateRange {
    /// Creates a window, rejecting inverted bounds
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self, TemporalError> {
        if let (Some(start), Some(end)) = (from, to) {
            if start > end {
                return Err(TemporalError::InvalidPeriod { start, end });
            }
        }
        Ok(Self { from, to })
    }

    pub fn between(from: NaiveDate, to: NaiveDate) -> Result<Self, TemporalError> {
        Self::new(Some(from), Some(to))
    }

    pub fn starting(from: NaiveDate) -> Self {
        Self { from: Some(from), to: None }
    }

    pub fn ending(to: NaiveDate) -> Self {
        Self { from: None, to: Some(to) }
    }

    pub fn from(&self) -> Option<NaiveDate> {
        self.from
    }

    pub fn to(&self) -> Option<NaiveDate> {
        self.to
    }

    /// True when neither bound is set
    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Inclusive containment check
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}
