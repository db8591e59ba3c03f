//! Period-over-period variation and per-metric polarity

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::kpi::Metric;

/// Signed percentage change from `baseline` to `current`
///
/// `None` when the baseline is absent or zero; the result is never
/// infinite or NaN for a finite input.
pub fn variation(current: f64, baseline: Option<f64>) -> Option<f64> {
    let baseline = baseline?;
    if baseline == 0.0 {
        return None;
    }
    Some((current - baseline) / baseline * 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    HigherIsBetter,
    LowerIsBetter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Assessment {
    Improvement,
    Regression,
    Neutral,
}

/// Which direction counts as progress for each metric
///
/// Metrics without an entry are higher-is-better.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolarityTable {
    entries: HashMap<Metric, Polarity>,
}

impl PolarityTable {
    /// Every metric higher-is-better
    pub fn uniform() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Table where the given metrics are lower-is-better
    pub fn lower_is_better<I>(metrics: I) -> Self
    where
        I: IntoIterator<Item = Metric>,
    {
        metrics
            .into_iter()
            .fold(Self::uniform(), |table, metric| {
                table.with(metric, Polarity::LowerIsBetter)
            })
    }

    pub fn with(mut self, metric: Metric, polarity: Polarity) -> Self {
        self.entries.insert(metric, polarity);
        self
    }

    pub fn polarity(&self, metric: Metric) -> Polarity {
        self.entries
            .get(&metric)
            .copied()
            .unwrap_or(Polarity::HigherIsBetter)
    }

    pub fn assess(&self, metric: Metric, variation: Option<f64>) -> Assessment {
        let Some(change) = variation else {
            return Assessment::Neutral;
        };
        let improving = match self.polarity(metric) {
            Polarity::HigherIsBetter => change > 0.0,
            Polarity::LowerIsBetter => change < 0.0,
        };
        if change == 0.0 {
            Assessment::Neutral
        } else if improving {
            Assessment::Improvement
        } else {
            Assessment::Regression
        }
    }
}

impl Default for PolarityTable {
    /// A rising bounce rate is a regression; everything else should grow
    fn default() -> Self {
        Self::lower_is_better([Metric::BounceRate])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variation_values() {
        assert_eq!(variation(110.0, Some(100.0)), Some(10.0));
        assert_eq!(variation(90.0, Some(100.0)), Some(-10.0));
        assert_eq!(variation(600.0, Some(500.0)), Some(20.0));
        assert_eq!(variation(0.0, Some(50.0)), Some(-100.0));
    }

    #[test]
    fn test_variation_undefined_without_usable_baseline() {
        for current in [0.0, 1.0, -3.5, 1e9] {
            assert_eq!(variation(current, Some(0.0)), None);
            assert_eq!(variation(current, Some(-0.0)), None);
            assert_eq!(variation(current, None), None);
        }
    }

    #[test]
    fn test_default_polarity_inverts_bounce_rate() {
        let table = PolarityTable::default();
        assert_eq!(table.assess(Metric::Visits, Some(5.0)), Assessment::Improvement);
        assert_eq!(table.assess(Metric::Visits, Some(-5.0)), Assessment::Regression);
        assert_eq!(table.assess(Metric::BounceRate, Some(5.0)), Assessment::Regression);
        assert_eq!(table.assess(Metric::BounceRate, Some(-5.0)), Assessment::Improvement);
        assert_eq!(table.assess(Metric::BounceRate, Some(0.0)), Assessment::Neutral);
        assert_eq!(table.assess(Metric::Downloads, None), Assessment::Neutral);
    }

    #[test]
    fn test_polarity_is_configurable() {
        let table = PolarityTable::uniform().with(Metric::AvgDuration, Polarity::LowerIsBetter);
        assert_eq!(table.polarity(Metric::BounceRate), Polarity::HigherIsBetter);
        assert_eq!(
            table.assess(Metric::AvgDuration, Some(12.0)),
            Assessment::Regression
        );
    }
}
