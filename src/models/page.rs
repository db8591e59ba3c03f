use serde::{Deserialize, Serialize};

use super::lenient;

/// One ranked content row for a site and a period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Site tag (e.g. "FA")
    #[serde(default, deserialize_with = "lenient::text")]
    pub site: String,

    /// `YYYY` for yearly rows, `YYYY-MM` for monthly rows
    #[serde(default, deserialize_with = "lenient::text")]
    pub date: String,

    #[serde(default, deserialize_with = "lenient::rank")]
    pub position: u32,

    /// "new", a stable marker, or a signed rank change such as "+3"
    #[serde(default, deserialize_with = "lenient::text")]
    pub evolution: String,

    #[serde(default, deserialize_with = "lenient::text")]
    pub url: String,

    #[serde(rename = "titre_page", default, deserialize_with = "lenient::text")]
    pub title: String,

    #[serde(rename = "vues", default, deserialize_with = "lenient::count")]
    pub views: u64,

    #[serde(rename = "pct_trafic", default, deserialize_with = "lenient::ratio")]
    pub traffic_share: f64,

    #[serde(rename = "taux_rebond", default, deserialize_with = "lenient::ratio")]
    pub bounce_rate: f64,

    #[serde(rename = "temps_moyen", default, deserialize_with = "lenient::text")]
    pub avg_time: String,
}
