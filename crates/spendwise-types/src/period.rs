//! Accounting period keys
//!
//! A [`Period`] is one calendar month. Ordering is year first, then month,
//! which is exactly the derive order of the fields.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Result, SpendError};

/// Earliest year a ledger entry may carry
pub const MIN_YEAR: i32 = 1900;
/// Latest year a ledger entry may carry
pub const MAX_YEAR: i32 = 9999;

/// A (year, month) accounting period
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    /// 1-based month
    pub month: u32,
}

impl Period {
    /// Create a validated period
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(SpendError::Validation(format!(
                "year must be between {} and {}, got {}",
                MIN_YEAR, MAX_YEAR, year
            )));
        }
        if !(1..=12).contains(&month) {
            return Err(SpendError::Validation(format!(
                "month must be between 1 and 12, got {}",
                month
            )));
        }
        Ok(Self { year, month })
    }

    /// Period containing the given instant (UTC calendar)
    pub fn from_date(date: DateTime<Utc>) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Period containing now
    pub fn current() -> Self {
        Self::from_date(Utc::now())
    }

    /// True iff `self` is chronologically earlier than `other`
    pub fn precedes(&self, other: &Period) -> bool {
        self < other
    }

    /// The following month, if it is still inside the supported range
    pub fn succ(&self) -> Option<Period> {
        let (year, month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        Period::new(year, month).ok()
    }

    /// The preceding month, if it is still inside the supported range
    pub fn pred(&self) -> Option<Period> {
        let (year, month) = if self.month == 1 {
            (self.year - 1, 12)
        } else {
            (self.year, self.month - 1)
        };
        Period::new(year, month).ok()
    }

    /// Half-open instant range `[start, end)` covered by this period
    pub fn bounds(&self) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        Ok((
            month_start(self.year, self.month)?,
            month_start(next_year, next_month)?,
        ))
    }

    /// True if the instant falls inside this period
    pub fn contains(&self, date: DateTime<Utc>) -> bool {
        Period::from_date(date) == *self
    }
}

fn month_start(year: i32, month: u32) -> Result<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| SpendError::Validation(format!("invalid period {}-{:02}", year, month)))
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
