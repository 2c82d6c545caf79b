// SPDX-License-Identifier: Apache-2.0

use crate::ParseError;
use chrono::NaiveDate;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};

/// A month-granularity accounting period, parsed from `"YYYY-MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeriodMonth {
    year: i32,
    month: u32,
}

impl PeriodMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, ParseError> {
        if !(1..=9999).contains(&year) {
            return Err(ParseError::OutOfRange("period year", "1..=9999"));
        }
        if !(1..=12).contains(&month) {
            return Err(ParseError::OutOfRange("period month", "1..=12"));
        }
        Ok(Self { year, month })
    }

    /// Strict `"YYYY-MM"` parse; the day of month is never part of the input.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.is_empty() {
            return Err(ParseError::Empty("period_month"));
        }
        let (year_raw, month_raw) = input
            .split_once('-')
            .ok_or(ParseError::InvalidFormat("period_month must be in YYYY-MM format"))?;
        if year_raw.len() != 4 || month_raw.len() != 2 {
            return Err(ParseError::InvalidFormat(
                "period_month must be in YYYY-MM format",
            ));
        }
        let year = year_raw
            .parse::<i32>()
            .map_err(|_| ParseError::InvalidFormat("period year must be an integer"))?;
        let month = month_raw
            .parse::<u32>()
            .map_err(|_| ParseError::InvalidFormat("period month must be an integer"))?;
        Self::new(year, month)
    }

    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// The first calendar day of the month; infallible because `new`
    /// bounds both fields.
    #[must_use]
    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).expect("validated on construction")
    }

    #[must_use]
    pub fn canonical_string(self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

impl Display for PeriodMonth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.canonical_string())
    }
}

impl Serialize for PeriodMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.canonical_string())
    }
}

impl<'de> Deserialize<'de> for PeriodMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(DeError::custom)
    }
}

/// The period a payout is recorded against. Distribution runs carry a
/// month; single-event entries (explicit payouts, top-ups) carry a
/// calendar date. Exactly one of the two exists per payout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Month(PeriodMonth),
    Date(NaiveDate),
}

impl Period {
    /// Collapses both variants onto a calendar date for ordering; a month
    /// sorts as its first day.
    #[must_use]
    pub fn sort_date(&self) -> NaiveDate {
        match self {
            Self::Month(month) => month.first_day(),
            Self::Date(date) => *date,
        }
    }

    #[must_use]
    pub fn canonical_string(&self) -> String {
        match self {
            Self::Month(month) => month.canonical_string(),
            Self::Date(date) => date.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Strict `"YYYY-MM-DD"` parse for single-event payout dates.
pub fn parse_calendar_date(input: &str) -> Result<NaiveDate, ParseError> {
    if input.is_empty() {
        return Err(ParseError::Empty("date"));
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| ParseError::InvalidFormat("date must be in YYYY-MM-DD format"))
}
