use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::aggregator::AggregateRecord;
use super::duration::parse_duration;
use crate::models::MetricRecord;

/// Headline metrics shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Visits,
    PageViews,
    BounceRate,
    AvgDuration,
    AvgActions,
    Downloads,
}

impl Metric {
    /// Display order of the KPI grid
    pub const ALL: [Metric; 6] = [
        Metric::Visits,
        Metric::PageViews,
        Metric::BounceRate,
        Metric::AvgDuration,
        Metric::AvgActions,
        Metric::Downloads,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Visits => "visits",
            Metric::PageViews => "page_views",
            Metric::BounceRate => "bounce_rate",
            Metric::AvgDuration => "avg_duration",
            Metric::AvgActions => "avg_actions",
            Metric::Downloads => "downloads",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|metric| metric.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown metric '{s}'"))
    }
}

/// Anything a KPI value can be read from
///
/// Bounce rate is returned as a percentage and durations in seconds.
pub trait MetricSource {
    fn metric(&self, metric: Metric) -> f64;
}

impl MetricSource for MetricRecord {
    fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Visits => self.visits as f64,
            Metric::PageViews => self.page_views as f64,
            Metric::BounceRate => self.bounce_rate * 100.0,
            Metric::AvgDuration => parse_duration(&self.avg_duration) as f64,
            Metric::AvgActions => self.avg_actions,
            Metric::Downloads => self.downloads as f64,
        }
    }
}

impl MetricSource for AggregateRecord {
    fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Visits => self.visits as f64,
            Metric::PageViews => self.page_views as f64,
            Metric::BounceRate => self.bounce_rate * 100.0,
            Metric::AvgDuration => self.avg_duration_secs,
            Metric::AvgActions => self.avg_actions,
            Metric::Downloads => self.downloads as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names_parse() {
        assert_eq!("bounce_rate".parse::<Metric>(), Ok(Metric::BounceRate));
        assert_eq!(" Visits ".parse::<Metric>(), Ok(Metric::Visits));
        assert!("rebond".parse::<Metric>().is_err());
    }

    #[test]
    fn test_record_values_use_display_units() {
        let record = MetricRecord {
            bounce_rate: 0.42,
            avg_duration: "2 min 30 s".to_string(),
            ..Default::default()
        };
        assert!((record.metric(Metric::BounceRate) - 42.0).abs() < 1e-9);
        assert_eq!(record.metric(Metric::AvgDuration), 150.0);
    }
}
