use serde::Serialize;
use std::collections::BTreeMap;

use super::format::{month_name, period_label};
use crate::metrics::{PeriodKey, YearMonth};
use crate::models::MetricRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodOption {
    pub period: PeriodKey,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearOption {
    pub period: PeriodKey,
    pub label: String,
    /// Newest month first
    pub months: Vec<PeriodOption>,
}

/// Selectable periods of a collection, newest first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodOptions {
    pub years: Vec<YearOption>,
    /// Latest month available, preselected by the dashboard
    pub default: Option<PeriodKey>,
}

pub fn period_options(rows: &[MetricRecord]) -> PeriodOptions {
    let mut by_year: BTreeMap<i32, Vec<YearMonth>> = BTreeMap::new();
    for month in rows.iter().filter_map(|row| YearMonth::from_date(&row.date)) {
        let months = by_year.entry(month.year()).or_default();
        if !months.contains(&month) {
            months.push(month);
        }
    }

    let years: Vec<YearOption> = by_year
        .into_iter()
        .rev()
        .map(|(year, mut months)| {
            months.sort_unstable_by(|a, b| b.cmp(a));
            YearOption {
                period: PeriodKey::Year(year),
                label: period_label(PeriodKey::Year(year)),
                months: months
                    .into_iter()
                    .map(|month| PeriodOption {
                        period: PeriodKey::Month(month),
                        label: month_name(month).to_string(),
                    })
                    .collect(),
            }
        })
        .collect();

    let default = years
        .first()
        .and_then(|year| year.months.first())
        .map(|month| month.period);

    PeriodOptions { years, default }
}
