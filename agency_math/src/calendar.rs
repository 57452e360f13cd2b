//! Calendar-month arithmetic
//!
//! Months are always 1-based (January is 1). Every month offset in the
//! workspace goes through [`add_months`], so the year rollover lives in
//! exactly one place.

use crate::{MathError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Add `offset` months to a 1-based `(year, month)` pair.
///
/// Month 13 rolls over to January of the following year and negative
/// offsets walk backwards across year boundaries.
///
/// # Examples
///
/// ```
/// use agency_math::add_months;
///
/// assert_eq!(add_months(2026, 11, 2), (2027, 1));
/// assert_eq!(add_months(2026, 1, -1), (2025, 12));
/// ```
pub fn add_months(year: i32, month: u32, offset: i32) -> (i32, u32) {
    let zero_based = i64::from(month) - 1 + i64::from(offset);
    let year = i64::from(year) + zero_based.div_euclid(12);
    let month = zero_based.rem_euclid(12) + 1;
    (year as i32, month as u32)
}

/// Parse an ISO `YYYY-MM-DD` date, returning `None` for empty or malformed text
pub fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

/// A calendar month, ordered chronologically
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Parts {
            year: i32,
            month: u32,
        }

        let parts = Parts::deserialize(deserializer)?;
        YearMonth::new(parts.year, parts.month).map_err(serde::de::Error::custom)
    }
}

impl YearMonth {
    /// Create a year-month, rejecting months outside 1..=12
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(MathError::InvalidMonth(month));
        }
        Ok(Self { year, month })
    }

    /// The month containing `date`
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The month `offset` months after this one (or before, when negative)
    pub fn plus(self, offset: i32) -> Self {
        let (year, month) = add_months(self.year, self.month, offset);
        Self { year, month }
    }

    /// Iterate over `count` consecutive months starting with this one
    pub fn iter_months(self, count: usize) -> impl Iterator<Item = YearMonth> {
        (0..count).map(move |i| self.plus(i as i32))
    }

    /// Short display label such as `Jan 2026`
    pub fn label(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%b %Y").to_string())
            .unwrap_or_else(|| self.to_string())
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
