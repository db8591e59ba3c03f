//! Yearly roll-up of monthly records
//!
//! Volume metrics are summed. Bounce rate, average actions and average
//! duration are plain means over the row count (not weighted by visits),
//! which matches the figures the dashboard has always published.

use serde::Serialize;

use super::duration::parse_duration;
use super::period::PeriodKey;
use crate::models::{DeviceBreakdown, MetricRecord, TrafficSources};

/// Synthetic record folding several monthly rows together
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateRecord {
    /// `YYYY` of the folded rows
    pub date: String,
    /// Number of monthly rows folded in
    pub count: usize,
    pub visits: u64,
    pub page_views: u64,
    pub downloads: u64,
    /// Mean of the monthly fractions
    pub bounce_rate: f64,
    pub avg_actions: f64,
    /// Mean in seconds, formatted back to text only for display
    pub avg_duration_secs: f64,
    pub sources: TrafficSources,
    pub devices: DeviceBreakdown,
}

/// Fold rows into a single record; `None` for an empty input
pub fn aggregate<'a, I>(rows: I) -> Option<AggregateRecord>
where
    I: IntoIterator<Item = &'a MetricRecord>,
{
    let mut agg = AggregateRecord::default();
    let mut bounce_sum = 0.0;
    let mut actions_sum = 0.0;
    let mut duration_sum: u64 = 0;
    let mut year: Option<i32> = None;

    for row in rows {
        agg.count += 1;
        agg.visits = agg.visits.saturating_add(row.visits);
        agg.page_views = agg.page_views.saturating_add(row.page_views);
        agg.downloads = agg.downloads.saturating_add(row.downloads);
        agg.sources.add(&row.sources);
        agg.devices.add(&row.devices);

        bounce_sum += row.bounce_rate;
        actions_sum += row.avg_actions;
        duration_sum = duration_sum.saturating_add(parse_duration(&row.avg_duration));

        if let Some(found) = PeriodKey::of_record_date(&row.date).map(|key| key.year()) {
            year = Some(year.map_or(found, |y| y.min(found)));
        }
    }

    if agg.count == 0 {
        return None;
    }

    let count = agg.count as f64;
    agg.bounce_rate = bounce_sum / count;
    agg.avg_actions = actions_sum / count;
    agg.avg_duration_secs = duration_sum as f64 / count;
    agg.date = year.map(|y| format!("{y:04}")).unwrap_or_default();

    Some(agg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str, visits: u64, bounce_rate: f64, duration: &str) -> MetricRecord {
        MetricRecord {
            date: date.to_string(),
            visits,
            page_views: visits * 2,
            bounce_rate,
            avg_actions: 2.0,
            avg_duration: duration.to_string(),
            sources: TrafficSources {
                search_engines: visits / 2,
                ..Default::default()
            },
            devices: DeviceBreakdown {
                smartphone: 1,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_input_is_absent() {
        assert_eq!(aggregate(&Vec::<MetricRecord>::new()), None);
    }

    #[test]
    fn test_volumes_sum_and_rates_average() {
        let rows = vec![
            row("2024-01", 100, 0.40, "2 min 0 s"),
            row("2024-02", 300, 0.60, "4 min 0 s"),
        ];

        let agg = aggregate(&rows).unwrap();
        assert_eq!(agg.date, "2024");
        assert_eq!(agg.count, 2);
        assert_eq!(agg.visits, 400);
        assert_eq!(agg.page_views, 800);
        assert_eq!(agg.sources.search_engines, 200);
        assert_eq!(agg.devices.smartphone, 2);
        // Unweighted: (0.40 + 0.60) / 2, not visit-weighted 0.55
        assert!((agg.bounce_rate - 0.50).abs() < 1e-9);
        assert!((agg.avg_actions - 2.0).abs() < 1e-9);
        assert!((agg.avg_duration_secs - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_malformed_duration_counts_as_zero() {
        let rows = vec![
            row("2024-01", 1, 0.0, "3 min 0 s"),
            row("2024-02", 1, 0.0, "??"),
        ];
        let agg = aggregate(&rows).unwrap();
        assert!((agg.avg_duration_secs - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_order_does_not_change_result() {
        let rows = vec![
            row("2024-05", 10, 0.25, "1 min 5 s"),
            row("2024-01", 20, 0.5, "2 min 10 s"),
            row("2024-09", 30, 0.125, "0 min 40 s"),
        ];
        let reversed: Vec<&MetricRecord> = rows.iter().rev().collect();

        assert_eq!(aggregate(&rows), aggregate(reversed));
    }

    #[test]
    fn test_huge_cells_saturate_instead_of_overflowing() {
        let row: MetricRecord = serde_json::from_value(serde_json::json!({
            "date": "2024-01",
            "visites": "1e19",
            "moteurs_de_recherche": "1e19"
        }))
        .unwrap();
        assert_eq!(row.visits, 10_000_000_000_000_000_000);

        let rows = vec![row.clone(), row];
        let agg = aggregate(&rows).unwrap();
        assert_eq!(agg.visits, u64::MAX);
        assert_eq!(agg.sources.search_engines, u64::MAX);
        assert_eq!(agg.count, 2);
    }
}
