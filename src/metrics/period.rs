//! Period tokens and calendar arithmetic
//!
//! Every consumer (resolver, ranker, views) goes through this module to
//! decide whether a string names a year or a month, so the inference lives
//! in one place.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    #[error("invalid period token '{0}': expected YYYY or YYYY-MM")]
    InvalidToken(String),
}

/// A calendar month, always valid (month in 1..=12)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    /// The calendar month immediately before, rolling January back to December
    pub fn previous(self) -> Self {
        self.months_back(1)
    }

    pub fn same_month_last_year(self) -> Self {
        Self {
            year: self.year - 1,
            month: self.month,
        }
    }

    pub fn months_back(self, months: u32) -> Self {
        let index = self.year as i64 * 12 + (self.month as i64 - 1) - months as i64;
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    /// Month of a record date: `YYYY-MM` or any longer string starting with it
    pub fn from_date(date: &str) -> Option<Self> {
        match PeriodKey::of_record_date(date)? {
            PeriodKey::Month(month) => Some(month),
            PeriodKey::Year(_) => None,
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// How a period selects date strings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Only dates of the same granularity: a year matches `YYYY` rows only
    #[default]
    Exact,
    /// A year also matches every `YYYY-MM` row it contains
    Prefix,
}

/// A resolved period selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodKey {
    Month(YearMonth),
    Year(i32),
}

fn parse_year(text: &str) -> Option<i32> {
    (text.len() == 4 && text.bytes().all(|b| b.is_ascii_digit()))
        .then(|| text.parse().ok())
        .flatten()
}

fn parse_month(text: &str) -> Option<u32> {
    (text.len() == 2 && text.bytes().all(|b| b.is_ascii_digit()))
        .then(|| text.parse().ok())
        .flatten()
}

impl PeriodKey {
    /// Parse a selector token, inferring year vs month from its shape
    pub fn parse(token: &str) -> Result<Self, PeriodError> {
        let invalid = || PeriodError::InvalidToken(token.to_string());
        let trimmed = token.trim();

        match trimmed.split_once('-') {
            None => parse_year(trimmed).map(Self::Year).ok_or_else(invalid),
            Some((year, month)) => {
                let year = parse_year(year).ok_or_else(invalid)?;
                let month = parse_month(month).ok_or_else(invalid)?;
                YearMonth::new(year, month)
                    .map(Self::Month)
                    .ok_or_else(invalid)
            }
        }
    }

    /// Granularity of a record date; anything past `YYYY-MM` is ignored
    pub fn of_record_date(date: &str) -> Option<Self> {
        let date = date.trim();
        let year = parse_year(date.get(..4)?)?;
        if date.len() == 4 {
            return Some(Self::Year(year));
        }
        if date.as_bytes()[4] != b'-' {
            return None;
        }
        let month = parse_month(date.get(5..7)?)?;
        if date.len() > 7 && date.as_bytes()[7].is_ascii_digit() {
            return None;
        }
        YearMonth::new(year, month).map(Self::Month)
    }

    pub fn year(&self) -> i32 {
        match self {
            Self::Month(month) => month.year(),
            Self::Year(year) => *year,
        }
    }

    pub fn is_year(&self) -> bool {
        matches!(self, Self::Year(_))
    }

    /// Whether a record date falls in this period
    pub fn matches(&self, date: &str, mode: MatchMode) -> bool {
        let Some(found) = Self::of_record_date(date) else {
            return false;
        };
        match (self, mode) {
            (Self::Year(year), MatchMode::Prefix) => found.year() == *year,
            _ => found == *self,
        }
    }
}

impl FromStr for PeriodKey {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Month(month) => fmt::Display::fmt(month, f),
            Self::Year(year) => write!(f, "{year:04}"),
        }
    }
}

impl Serialize for PeriodKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    #[test]
    fn test_parse_infers_granularity_from_shape() {
        assert_eq!(PeriodKey::parse("2025").unwrap(), PeriodKey::Year(2025));
        assert_eq!(
            PeriodKey::parse("2025-01").unwrap(),
            PeriodKey::Month(ym(2025, 1))
        );
        assert_eq!("2024-12".parse::<PeriodKey>().unwrap().to_string(), "2024-12");
    }

    #[test]
    fn test_parse_rejects_malformed_tokens() {
        for token in ["", "25", "2025-1", "2025-13", "2025-00", "year-2025", "2025-01-01", "20a5"] {
            assert_eq!(
                PeriodKey::parse(token),
                Err(PeriodError::InvalidToken(token.to_string())),
                "token {token:?}"
            );
        }
    }

    #[test]
    fn test_previous_month_rolls_back_over_january() {
        assert_eq!(ym(2025, 1).previous(), ym(2024, 12));
        assert_eq!(ym(2025, 3).previous(), ym(2025, 2));
        assert_eq!(ym(2025, 1).same_month_last_year(), ym(2024, 1));
        assert_eq!(ym(2025, 5).months_back(11), ym(2024, 6));
        assert_eq!(ym(2025, 5).months_back(0), ym(2025, 5));
    }

    #[test]
    fn test_record_date_granularity() {
        assert_eq!(PeriodKey::of_record_date("2024"), Some(PeriodKey::Year(2024)));
        assert_eq!(
            PeriodKey::of_record_date("2024-06"),
            Some(PeriodKey::Month(ym(2024, 6)))
        );
        assert_eq!(
            PeriodKey::of_record_date("2024-06-01T00:00:00.000Z"),
            Some(PeriodKey::Month(ym(2024, 6)))
        );
        assert_eq!(PeriodKey::of_record_date("20240"), None);
        assert_eq!(PeriodKey::of_record_date("2024-061"), None);
        assert_eq!(PeriodKey::of_record_date("juin 2024"), None);
    }

    #[test]
    fn test_year_matching_modes() {
        let year = PeriodKey::Year(2024);
        assert!(year.matches("2024", MatchMode::Exact));
        assert!(!year.matches("2024-03", MatchMode::Exact));
        assert!(year.matches("2024-03", MatchMode::Prefix));
        assert!(year.matches("2024", MatchMode::Prefix));
        assert!(!year.matches("2023-03", MatchMode::Prefix));

        let month = PeriodKey::Month(ym(2024, 3));
        assert!(month.matches("2024-03", MatchMode::Exact));
        assert!(month.matches("2024-03", MatchMode::Prefix));
        assert!(!month.matches("2024", MatchMode::Prefix));
    }
}
