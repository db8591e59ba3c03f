use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::metrics::{MatchMode, Metric};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    pub api_server: ServerConfig,
    pub sites: Vec<SiteConfig>,
    pub view: ViewConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// URL of the spreadsheet JSON export
    pub url: Option<String>,
    /// On-disk cache file; `None` disables the disk layer
    pub cache_path: Option<PathBuf>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// One analytics property and how it is presented
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Short tag used in page rows and URLs (e.g. "FA")
    pub tag: String,
    /// Sheet holding the monthly rows
    pub collection: String,
    /// Display name
    pub name: String,
    /// Chart colors, consumed by the front-end only
    #[serde(default)]
    pub palette: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Metrics where a decrease is an improvement
    pub lower_is_better: Vec<Metric>,
    /// Whether a year selection also picks up monthly page rows
    pub top_pages_prefix_match: bool,
}

#[derive(Debug, Deserialize)]
struct SitesFile {
    sites: Vec<SiteConfig>,
}

impl SourceConfig {
    const fn default_timeout_secs() -> u64 {
        30
    }
}

impl ViewConfig {
    pub fn match_mode(&self) -> MatchMode {
        if self.top_pages_prefix_match {
            MatchMode::Prefix
        } else {
            MatchMode::Exact
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            lower_is_better: vec![Metric::BounceRate],
            top_pages_prefix_match: false,
        }
    }
}

fn palette(colors: &[&str]) -> Vec<String> {
    colors.iter().map(|c| c.to_string()).collect()
}

/// The two properties the dashboard was built for
pub fn default_sites() -> Vec<SiteConfig> {
    vec![
        SiteConfig {
            tag: "FA".to_string(),
            collection: "Data FA".to_string(),
            name: "France Assureurs".to_string(),
            palette: palette(&[
                "#FA5629", "#007770", "#4984A9", "#68B0AC", "#FFB347", "#77DD77", "#A181E0",
            ]),
        },
        SiteConfig {
            tag: "AP".to_string(),
            collection: "Data AP".to_string(),
            name: "Assurance Prévention".to_string(),
            palette: palette(&[
                "#fdc300", "#005da4", "#00a3bb", "#0587b5", "#f07d19", "#292e6b", "#8bc34a",
            ]),
        },
    ]
}

/// Load a sites file (TOML, JSON or YAML, chosen by extension)
pub fn load_sites_file(path: &str) -> anyhow::Result<Vec<SiteConfig>> {
    let file: SitesFile = config::Config::builder()
        .add_source(config::File::with_name(path))
        .build()
        .with_context(|| format!("Failed to read sites file {path}"))?
        .try_deserialize()
        .with_context(|| format!("Invalid sites file {path}"))?;

    if file.sites.is_empty() {
        anyhow::bail!("Sites file {path} does not declare any site");
    }
    Ok(file.sites)
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let url = std::env::var("KPIBOARD_SOURCE_URL").ok();

        let cache_path = if env_flag("KPIBOARD_CACHE_DISABLED") {
            None
        } else {
            Some(PathBuf::from(
                std::env::var("KPIBOARD_CACHE_PATH")
                    .unwrap_or_else(|_| "./kpiboard-cache.json".to_string()),
            ))
        };

        let timeout_secs = std::env::var("KPIBOARD_FETCH_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or_else(SourceConfig::default_timeout_secs);

        let api_host = std::env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let api_port = std::env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("API_PORT must be a port number")?;

        let sites = match std::env::var("KPIBOARD_SITES_FILE") {
            Ok(path) => load_sites_file(&path)?,
            Err(_) => default_sites(),
        };

        let lower_is_better = match std::env::var("KPIBOARD_LOWER_IS_BETTER") {
            Ok(list) => parse_metric_list(&list),
            Err(_) => ViewConfig::default().lower_is_better,
        };

        Ok(Config {
            source: SourceConfig {
                url,
                cache_path,
                timeout_secs,
            },
            api_server: ServerConfig {
                host: api_host,
                port: api_port,
            },
            sites,
            view: ViewConfig {
                lower_is_better,
                top_pages_prefix_match: env_flag("KPIBOARD_TOP_PAGES_PREFIX_MATCH"),
            },
        })
    }
}

/// Comma separated metric names; unknown names are skipped with a warning
fn parse_metric_list(list: &str) -> Vec<Metric> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .filter_map(|name| match name.parse::<Metric>() {
            Ok(metric) => Some(metric),
            Err(e) => {
                tracing::warn!("{e}, ignoring it in KPIBOARD_LOWER_IS_BETTER");
                None
            }
        })
        .collect()
}
