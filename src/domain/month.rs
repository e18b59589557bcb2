//! Month calendar
//!
//! The whole crate works at month granularity. A [`MonthToken`] is a
//! `(year, month)` pair written canonically as `YYYY-MM`; a [`MonthSpan`] is
//! an inclusive run of months between two tokens.
//!
//! Tokens map onto a dense integer index (`year * 12 + month - 1`) so that
//! ordering, distance and succession are plain integer arithmetic.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MonthError {
    #[error("Invalid month format: expected 'YYYY-MM', got '{0}'")]
    Format(String),

    #[error("End month {end} precedes start month {start}")]
    Range { start: MonthToken, end: MonthToken },
}

/// A calendar month, canonically `YYYY-MM`
///
/// Ordering is lexicographic on `(year, month)`, which the derived
/// `Ord` gives us from the field order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthToken {
    year: i32,
    month: u32,
}

impl MonthToken {
    /// Creates a token, rejecting months outside 1..=12 and years that do
    /// not fit the four-digit canonical form
    pub fn new(year: i32, month: u32) -> Result<Self, MonthError> {
        if !(1..=12).contains(&month) || !(0..=9999).contains(&year) {
            return Err(MonthError::Format(format!("{:04}-{:02}", year, month)));
        }
        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month number, 1 through 12
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Dense month index: `year * 12 + (month - 1)`
    pub fn index(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }

    /// Inverse of [`MonthToken::index`]
    pub fn from_index(index: i64) -> Self {
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    /// The calendar month containing `date`
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The immediately following month, rolling December into January
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Returns true if `other` is the month right after this one
    pub fn is_followed_by(&self, other: &MonthToken) -> bool {
        self.next() == *other
    }

    /// First calendar day of the month
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Last calendar day of the month
    pub fn last_day(&self) -> Option<NaiveDate> {
        self.next().first_day().and_then(|d| d.pred_opt())
    }
}

impl fmt::Display for MonthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthToken {
    type Err = MonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        let well_formed = bytes.len() == 7
            && bytes[4] == b'-'
            && bytes[..4].iter().all(u8::is_ascii_digit)
            && bytes[5..].iter().all(u8::is_ascii_digit);
        if !well_formed {
            return Err(MonthError::Format(s.to_string()));
        }

        let year: i32 = s[..4]
            .parse()
            .map_err(|_| MonthError::Format(s.to_string()))?;
        let month: u32 = s[5..]
            .parse()
            .map_err(|_| MonthError::Format(s.to_string()))?;

        Self::new(year, month).map_err(|_| MonthError::Format(s.to_string()))
    }
}

impl TryFrom<String> for MonthToken {
    type Error = MonthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthToken> for String {
    fn from(token: MonthToken) -> Self {
        token.to_string()
    }
}

/// Number of months from `start` to `end`, both included
///
/// `2023-04..=2023-06` is 3 months. Fails when `end` precedes `start`.
pub fn month_distance_inclusive(start: MonthToken, end: MonthToken) -> Result<u32, MonthError> {
    if end < start {
        return Err(MonthError::Range { start, end });
    }
    Ok((end.index() - start.index() + 1) as u32)
}

/// Every month from `start` to `end` inclusive, ascending
///
/// Empty when `end` precedes `start`.
pub fn enumerate_months(start: MonthToken, end: MonthToken) -> Vec<MonthToken> {
    (start.index()..=end.index())
        .map(MonthToken::from_index)
        .collect()
}

/// A month count split into whole years and remaining months
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct YearsMonths {
    pub years: u32,
    pub months: u32,
}

impl YearsMonths {
    /// Splits a month count by 12: 25 months is 2 years 1 month
    pub fn from_months(total_months: u32) -> Self {
        Self {
            years: total_months / 12,
            months: total_months % 12,
        }
    }

    pub fn total_months(&self) -> u32 {
        self.years * 12 + self.months
    }
}

impl fmt::Display for YearsMonths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}년 {}개월", self.years, self.months)
    }
}

/// An inclusive, validated run of months
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthSpan {
    start: MonthToken,
    end: MonthToken,
}

impl MonthSpan {
    pub fn new(start: MonthToken, end: MonthToken) -> Result<Self, MonthError> {
        if end < start {
            return Err(MonthError::Range { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parses both ends in canonical form and validates their order
    pub fn parse(start: &str, end: &str) -> Result<Self, MonthError> {
        Self::new(start.parse()?, end.parse()?)
    }

    pub fn start(&self) -> MonthToken {
        self.start
    }

    pub fn end(&self) -> MonthToken {
        self.end
    }

    /// Inclusive month count, always at least 1
    pub fn len(&self) -> u32 {
        (self.end.index() - self.start.index() + 1) as u32
    }

    pub fn months(&self) -> Vec<MonthToken> {
        enumerate_months(self.start, self.end)
    }

    pub fn contains(&self, month: MonthToken) -> bool {
        self.start <= month && month <= self.end
    }

    /// Returns true if the two spans share at least one month
    pub fn overlaps(&self, other: &MonthSpan) -> bool {
        !(self.end < other.start || other.end < self.start)
    }
}

impl fmt::Display for MonthSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ~ {}", self.start, self.end)
    }
}
