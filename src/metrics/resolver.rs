//! Period resolution over a metric collection
//!
//! Collections are treated as unordered. When the source happens to be
//! sorted newest first, the row right after the current month is usually
//! the previous month; that shortcut is tried first and always checked
//! against the calendar key before being trusted.

use super::period::{MatchMode, PeriodKey, YearMonth};
use crate::models::MetricRecord;

/// Current month plus its two baselines; any of them may be absent
#[derive(Debug, Clone, PartialEq)]
pub struct MonthResolution<'a> {
    pub month: YearMonth,
    pub current: Option<&'a MetricRecord>,
    pub previous_month: Option<&'a MetricRecord>,
    pub previous_year: Option<&'a MetricRecord>,
}

/// Monthly rows of a year and of the year before, in source order
#[derive(Debug, Clone, PartialEq)]
pub struct YearResolution<'a> {
    pub year: i32,
    pub current: Vec<&'a MetricRecord>,
    pub previous: Vec<&'a MetricRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<'a> {
    Month(MonthResolution<'a>),
    Year(YearResolution<'a>),
}

pub fn resolve(rows: &[MetricRecord], key: PeriodKey) -> Resolution<'_> {
    match key {
        PeriodKey::Month(month) => Resolution::Month(resolve_month(rows, month)),
        PeriodKey::Year(year) => Resolution::Year(resolve_year(rows, year)),
    }
}

pub fn resolve_month(rows: &[MetricRecord], month: YearMonth) -> MonthResolution<'_> {
    let found = find_month(rows, month);
    let current_index = found.map(|(index, _)| index);

    let previous_month = adjacent_previous(rows, current_index, month.previous())
        .or_else(|| find_month(rows, month.previous()).map(|(_, row)| row));
    let previous_year = find_month(rows, month.same_month_last_year()).map(|(_, row)| row);

    MonthResolution {
        month,
        current: found.map(|(_, row)| row),
        previous_month,
        previous_year,
    }
}

pub fn resolve_year(rows: &[MetricRecord], year: i32) -> YearResolution<'_> {
    YearResolution {
        year,
        current: rows_in(rows, PeriodKey::Year(year)),
        previous: rows_in(rows, PeriodKey::Year(year - 1)),
    }
}

/// First row whose date falls in the given month
pub fn find_month(rows: &[MetricRecord], month: YearMonth) -> Option<(usize, &MetricRecord)> {
    rows.iter()
        .enumerate()
        .find(|(_, row)| YearMonth::from_date(&row.date) == Some(month))
}

/// Rows of the `span` calendar months ending at `month`, in source order
pub fn trailing_months(rows: &[MetricRecord], month: YearMonth, span: u32) -> Vec<&MetricRecord> {
    if span == 0 {
        return Vec::new();
    }
    let first = month.months_back(span - 1);
    rows.iter()
        .filter(|row| {
            YearMonth::from_date(&row.date).is_some_and(|found| found >= first && found <= month)
        })
        .collect()
}

fn rows_in(rows: &[MetricRecord], key: PeriodKey) -> Vec<&MetricRecord> {
    rows.iter()
        .filter(|row| key.matches(&row.date, MatchMode::Prefix))
        .collect()
}

fn adjacent_previous(
    rows: &[MetricRecord],
    current_index: Option<usize>,
    target: YearMonth,
) -> Option<&MetricRecord> {
    let next = rows.get(current_index? + 1)?;
    (YearMonth::from_date(&next.date) == Some(target)).then_some(next)
}
