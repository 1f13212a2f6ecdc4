use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A year-month period an estimate applies to, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReferenceMonth {
    year: i32,
    month: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid reference month '{0}', expected YYYY-MM")]
pub struct ParseReferenceMonthError(String);

impl ReferenceMonth {
    pub fn new(
        year: i32,
        month: u32,
    ) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    /// The month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
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

    /// Last calendar day of the reference year, the annual filing deadline
    /// used for income-based taxes.
    pub fn year_end(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, 12, 31).unwrap_or(NaiveDate::MAX)
    }
}

impl FromStr for ReferenceMonth {
    type Err = ParseReferenceMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d")
            .map(Self::containing)
            .map_err(|_| ParseReferenceMonthError(s.to_string()))
    }
}

impl TryFrom<String> for ReferenceMonth {
    type Error = ParseReferenceMonthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ReferenceMonth> for String {
    fn from(value: ReferenceMonth) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ReferenceMonth {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_year_month() {
        let month: ReferenceMonth = "2025-03".parse().unwrap();

        assert_eq!(month.year(), 2025);
        assert_eq!(month.month(), 3);
    }

    #[test]
    fn display_zero_pads_month() {
        assert_eq!(ReferenceMonth::new(2024, 7).unwrap().to_string(), "2024-07");
    }

    #[test]
    fn rejects_out_of_range_month() {
        let result = "2025-13".parse::<ReferenceMonth>();

        assert_eq!(
            result,
            Err(ParseReferenceMonthError("2025-13".to_string()))
        );
    }

    #[test]
    fn rejects_full_dates() {
        assert!("2025-03-10".parse::<ReferenceMonth>().is_err());
    }

    #[test]
    fn year_end_is_december_thirty_first() {
        let month = ReferenceMonth::new(2025, 4).unwrap();

        assert_eq!(month.year_end(), NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }

    #[test]
    fn serializes_as_string() {
        let month = ReferenceMonth::new(2025, 1).unwrap();

        let json = serde_json::to_string(&month).unwrap();
        let back: ReferenceMonth = serde_json::from_str(&json).unwrap();

        assert_eq!(json, "\"2025-01\"");
        assert_eq!(back, month);
    }
}
