//! Month and year views handed to the presentation layer
//!
//! A view never fails because data is missing: absent records, baselines
//! and comparisons simply come out as `None` or empty lists.

use serde::Serialize;

use super::format::{
    format_metric, format_number, format_share, format_variation, metric_title, period_label,
    MONTH_NAMES,
};
use crate::config::SiteConfig;
use crate::metrics::resolver::{find_month, resolve_month, resolve_year, trailing_months};
use crate::metrics::{
    aggregate, top_content, variation, AggregateRecord, Assessment, EvolutionClass, MatchMode,
    Metric, MetricSource, PeriodKey, PolarityTable, YearMonth, TOP_CONTENT_LIMIT,
};
use crate::models::{Dataset, DeviceBreakdown, MetricRecord, PageRecord, TrafficSources};

/// Label of the previous-month baseline
pub const PREVIOUS_MONTH_LABEL: &str = "M-1";

/// Months covered by the month view's evolution series
const EVOLUTION_SPAN: u32 = 12;

/// Presentation policy applied when building views
#[derive(Debug, Clone, Default)]
pub struct ViewOptions {
    pub polarity: PolarityTable,
    pub page_match: MatchMode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub label: String,
    pub baseline: f64,
    pub variation: f64,
    pub display: String,
    pub assessment: Assessment,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiCard {
    pub metric: Metric,
    pub title: &'static str,
    pub value: f64,
    pub display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vs_previous_month: Option<Comparison>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vs_previous_year: Option<Comparison>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: String,
    pub visits: u64,
    pub page_views: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyVisits {
    pub month: &'static str,
    pub current: u64,
    pub previous: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPage {
    pub position: u32,
    pub evolution: String,
    pub evolution_class: EvolutionClass,
    pub url: String,
    pub title: String,
    pub views: u64,
    pub views_display: String,
    pub traffic_share: f64,
    pub traffic_share_display: String,
    pub bounce_rate: f64,
    pub bounce_rate_display: String,
    pub avg_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthView {
    pub site: String,
    pub period: PeriodKey,
    pub label: String,
    pub current: Option<MetricRecord>,
    pub previous_month: Option<MetricRecord>,
    pub previous_year: Option<MetricRecord>,
    pub previous_month_label: String,
    pub previous_year_label: String,
    /// Empty when the month has no record
    pub kpis: Vec<KpiCard>,
    pub sources: Option<TrafficSources>,
    pub devices: Option<DeviceBreakdown>,
    pub top_pages: Vec<TopPage>,
    pub evolution: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearView {
    pub site: String,
    pub period: PeriodKey,
    pub label: String,
    pub current: Option<AggregateRecord>,
    pub previous: Option<AggregateRecord>,
    pub previous_label: String,
    pub kpis: Vec<KpiCard>,
    pub sources: Option<TrafficSources>,
    pub devices: Option<DeviceBreakdown>,
    pub top_pages: Vec<TopPage>,
    pub evolution: Vec<SeriesPoint>,
    /// Visits per calendar month, this year against the previous one
    pub comparison: Vec<MonthlyVisits>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DashboardView {
    Month(MonthView),
    Year(YearView),
}

struct Baseline<'a, B> {
    record: &'a B,
    label: &'a str,
}

fn compare<B: MetricSource>(
    metric: Metric,
    value: f64,
    baseline: Option<&Baseline<'_, B>>,
    polarity: &PolarityTable,
) -> Option<Comparison> {
    let baseline = baseline?;
    let base = baseline.record.metric(metric);
    let change = variation(value, Some(base))?;
    Some(Comparison {
        label: baseline.label.to_string(),
        baseline: base,
        variation: change,
        display: format_variation(change),
        assessment: polarity.assess(metric, Some(change)),
    })
}

fn kpi_cards<C, B>(
    current: &C,
    previous_month: Option<Baseline<'_, B>>,
    previous_year: Option<Baseline<'_, B>>,
    polarity: &PolarityTable,
) -> Vec<KpiCard>
where
    C: MetricSource,
    B: MetricSource,
{
    Metric::ALL
        .into_iter()
        .map(|metric| {
            let value = current.metric(metric);
            KpiCard {
                metric,
                title: metric_title(metric),
                value,
                display: format_metric(metric, value),
                vs_previous_month: compare(metric, value, previous_month.as_ref(), polarity),
                vs_previous_year: compare(metric, value, previous_year.as_ref(), polarity),
            }
        })
        .collect()
}

fn series<'a, I>(rows: I) -> Vec<SeriesPoint>
where
    I: IntoIterator<Item = &'a MetricRecord>,
{
    rows.into_iter()
        .map(|row| SeriesPoint {
            date: row.date.clone(),
            visits: row.visits,
            page_views: row.page_views,
        })
        .collect()
}

fn top_pages(
    dataset: &Dataset,
    site: &SiteConfig,
    period: PeriodKey,
    mode: MatchMode,
) -> Vec<TopPage> {
    top_content(dataset.pages(), &site.tag, period, TOP_CONTENT_LIMIT, mode)
        .into_iter()
        .map(top_page)
        .collect()
}

fn top_page(page: &PageRecord) -> TopPage {
    TopPage {
        position: page.position,
        evolution: page.evolution.clone(),
        evolution_class: EvolutionClass::classify(&page.evolution),
        url: page.url.clone(),
        title: page.title.clone(),
        views: page.views,
        views_display: format_number(page.views),
        traffic_share: page.traffic_share,
        traffic_share_display: format_share(page.traffic_share, 1),
        bounce_rate: page.bounce_rate,
        bounce_rate_display: format_share(page.bounce_rate, 0),
        avg_time: page.avg_time.clone(),
    }
}

pub fn month_view(
    dataset: &Dataset,
    site: &SiteConfig,
    month: YearMonth,
    options: &ViewOptions,
) -> MonthView {
    let rows = dataset.rows(&site.collection);
    let resolved = resolve_month(rows, month);
    let period = PeriodKey::Month(month);
    let previous_year_label = period_label(PeriodKey::Month(month.same_month_last_year()));

    let kpis = resolved
        .current
        .map(|current| {
            kpi_cards(
                current,
                resolved.previous_month.map(|record| Baseline {
                    record,
                    label: PREVIOUS_MONTH_LABEL,
                }),
                resolved.previous_year.map(|record| Baseline {
                    record,
                    label: &previous_year_label,
                }),
                &options.polarity,
            )
        })
        .unwrap_or_default();

    MonthView {
        site: site.tag.clone(),
        period,
        label: period_label(period),
        current: resolved.current.cloned(),
        previous_month: resolved.previous_month.cloned(),
        previous_year: resolved.previous_year.cloned(),
        previous_month_label: PREVIOUS_MONTH_LABEL.to_string(),
        previous_year_label: previous_year_label.clone(),
        kpis,
        sources: resolved.current.map(|r| r.sources),
        devices: resolved.current.map(|r| r.devices),
        top_pages: top_pages(dataset, site, period, options.page_match),
        evolution: series(trailing_months(rows, month, EVOLUTION_SPAN)),
    }
}

pub fn year_view(
    dataset: &Dataset,
    site: &SiteConfig,
    year: i32,
    options: &ViewOptions,
) -> YearView {
    let rows = dataset.rows(&site.collection);
    let resolved = resolve_year(rows, year);
    let period = PeriodKey::Year(year);
    let previous_label = period_label(PeriodKey::Year(year - 1));

    let current = aggregate(resolved.current.iter().copied());
    let previous = aggregate(resolved.previous.iter().copied());

    let kpis = current
        .as_ref()
        .map(|agg| {
            kpi_cards(
                agg,
                None::<Baseline<'_, AggregateRecord>>,
                previous.as_ref().map(|record| Baseline {
                    record,
                    label: &previous_label,
                }),
                &options.polarity,
            )
        })
        .unwrap_or_default();

    let comparison = MONTH_NAMES
        .into_iter()
        .zip(1..=12u32)
        .map(|(name, month)| {
            let visits = |y: i32| {
                YearMonth::new(y, month)
                    .and_then(|key| find_month(rows, key))
                    .map(|(_, row)| row.visits)
                    .unwrap_or(0)
            };
            MonthlyVisits {
                month: name,
                current: visits(year),
                previous: visits(year - 1),
            }
        })
        .collect();

    YearView {
        site: site.tag.clone(),
        period,
        label: period_label(period),
        sources: current.as_ref().map(|agg| agg.sources),
        devices: current.as_ref().map(|agg| agg.devices),
        current,
        previous,
        previous_label,
        kpis,
        top_pages: top_pages(dataset, site, period, options.page_match),
        evolution: series(resolved.current.iter().copied()),
        comparison,
    }
}

/// Month or year view depending on the period
pub fn build_view(
    dataset: &Dataset,
    site: &SiteConfig,
    period: PeriodKey,
    options: &ViewOptions,
) -> DashboardView {
    match period {
        PeriodKey::Month(month) => DashboardView::Month(month_view(dataset, site, month, options)),
        PeriodKey::Year(year) => DashboardView::Year(year_view(dataset, site, year, options)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn site() -> SiteConfig {
        SiteConfig {
            tag: "FA".to_string(),
            collection: "Data FA".to_string(),
            name: "France Assureurs".to_string(),
            palette: Vec::new(),
        }
    }

    fn row(date: &str, visits: u64, bounce_rate: f64) -> MetricRecord {
        MetricRecord {
            date: date.to_string(),
            visits,
            bounce_rate,
            ..Default::default()
        }
    }

    fn dataset(rows: Vec<MetricRecord>) -> Dataset {
        let mut collections = BTreeMap::new();
        collections.insert("Data FA".to_string(), rows);
        Dataset::new(collections, Vec::new())
    }

    fn card(cards: &[KpiCard], metric: Metric) -> &KpiCard {
        cards.iter().find(|c| c.metric == metric).unwrap()
    }

    #[test]
    fn test_month_view_comparisons_and_polarity() {
        let data = dataset(vec![
            row("2025-01", 600, 0.30),
            row("2024-12", 500, 0.25),
            row("2024-01", 0, 0.50),
        ]);
        let month = YearMonth::new(2025, 1).unwrap();
        let view = month_view(&data, &site(), month, &ViewOptions::default());

        assert_eq!(view.label, "Janvier 2025");
        assert_eq!(view.previous_year_label, "Janvier 2024");

        let visits = card(&view.kpis, Metric::Visits);
        assert_eq!(visits.display, "600");
        let vs_month = visits.vs_previous_month.as_ref().unwrap();
        assert_eq!(vs_month.variation, 20.0);
        assert_eq!(vs_month.display, "+20.0%");
        assert_eq!(vs_month.assessment, Assessment::Improvement);
        // Zero baseline: no comparison at all
        assert!(visits.vs_previous_year.is_none());

        let bounce = card(&view.kpis, Metric::BounceRate);
        let vs_month = bounce.vs_previous_month.as_ref().unwrap();
        assert_eq!(vs_month.assessment, Assessment::Regression);
        let vs_year = bounce.vs_previous_year.as_ref().unwrap();
        assert_eq!(vs_year.label, "Janvier 2024");
        assert_eq!(vs_year.assessment, Assessment::Improvement);
    }

    #[test]
    fn test_month_view_without_data() {
        let data = dataset(vec![row("2025-01", 600, 0.3)]);
        let month = YearMonth::new(2023, 6).unwrap();
        let view = month_view(&data, &site(), month, &ViewOptions::default());

        assert!(view.current.is_none());
        assert!(view.previous_month.is_none());
        assert!(view.previous_year.is_none());
        assert!(view.kpis.is_empty());
        assert!(view.sources.is_none());
        assert!(view.evolution.is_empty());
    }

    #[test]
    fn test_year_view_comparison_series() {
        let data = dataset(vec![
            row("2024-02", 20, 0.0),
            row("2024-01", 10, 0.0),
            row("2023-01", 5, 0.0),
        ]);
        let view = year_view(&data, &site(), 2024, &ViewOptions::default());

        assert_eq!(view.current.as_ref().map(|a| a.visits), Some(30));
        assert_eq!(view.previous.as_ref().map(|a| a.visits), Some(5));
        assert_eq!(view.previous_label, "2023");
        assert_eq!(view.comparison.len(), 12);
        assert_eq!(view.comparison[0].month, "Janvier");
        assert_eq!(view.comparison[0].current, 10);
        assert_eq!(view.comparison[0].previous, 5);
        assert_eq!(view.comparison[1].previous, 0);
        assert_eq!(view.comparison[11].current, 0);

        let evolution: Vec<&str> = view.evolution.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(evolution, vec!["2024-02", "2024-01"]);

        let visits = card(&view.kpis, Metric::Visits);
        assert!(visits.vs_previous_month.is_none());
        assert_eq!(visits.vs_previous_year.as_ref().map(|c| c.variation), Some(500.0));
    }
}
