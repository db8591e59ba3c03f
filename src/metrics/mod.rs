//! Period-based metrics engine
//!
//! Pure functions over an immutable dataset: period resolution, yearly
//! roll-ups, variations and the top-content leaderboard. Nothing here does
//! I/O or keeps state between calls.

pub mod aggregator;
pub mod duration;
pub mod kpi;
pub mod period;
pub mod ranking;
pub mod resolver;
pub mod variation;

pub use aggregator::{aggregate, AggregateRecord};
pub use duration::parse_duration;
pub use kpi::{Metric, MetricSource};
pub use period::{MatchMode, PeriodError, PeriodKey, YearMonth};
pub use ranking::{top_content, EvolutionClass, TOP_CONTENT_LIMIT};
pub use resolver::{
    resolve, resolve_month, resolve_year, MonthResolution, Resolution, YearResolution,
};
pub use variation::{variation, Assessment, Polarity, PolarityTable};
