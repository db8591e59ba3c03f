//! Presentation-facing views built on the metrics engine
//!
//! Site names, French labels and display strings live here; the engine in
//! `metrics` never sees them.

pub mod format;
pub mod periods;
pub mod view;

use thiserror::Error;

use crate::config::SiteConfig;
use crate::metrics::{PeriodError, PeriodKey, PolarityTable};
use crate::models::Dataset;

pub use periods::{period_options, PeriodOptions};
pub use view::{build_view, DashboardView, MonthView, ViewOptions, YearView};

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("unknown site '{0}'")]
    UnknownSite(String),
    #[error(transparent)]
    InvalidPeriod(#[from] PeriodError),
}

pub fn find_site<'a>(sites: &'a [SiteConfig], tag: &str) -> Result<&'a SiteConfig, ViewError> {
    sites
        .iter()
        .find(|site| site.tag.eq_ignore_ascii_case(tag))
        .ok_or_else(|| ViewError::UnknownSite(tag.to_string()))
}

/// View for a site tag and a raw period token
pub fn view_for(
    dataset: &Dataset,
    sites: &[SiteConfig],
    tag: &str,
    token: &str,
    options: &ViewOptions,
) -> Result<DashboardView, ViewError> {
    let site = find_site(sites, tag)?;
    let period = PeriodKey::parse(token)?;
    Ok(build_view(dataset, site, period, options))
}

/// Period options of a site's collection
pub fn periods_for(
    dataset: &Dataset,
    sites: &[SiteConfig],
    tag: &str,
) -> Result<PeriodOptions, ViewError> {
    let site = find_site(sites, tag)?;
    Ok(period_options(dataset.rows(&site.collection)))
}

impl ViewOptions {
    pub fn from_config(view: &crate::config::ViewConfig) -> Self {
        Self {
            polarity: PolarityTable::lower_is_better(view.lower_is_better.iter().copied()),
            page_match: view.match_mode(),
        }
    }
}
