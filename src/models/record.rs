use serde::{Deserialize, Serialize};

use super::lenient;

/// One calendar month of analytics for one site
///
/// Wire names follow the spreadsheet columns. `date` is `YYYY-MM` (or any
/// longer date string starting with it).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    #[serde(default, deserialize_with = "lenient::text")]
    pub date: String,

    #[serde(rename = "visites", default, deserialize_with = "lenient::count")]
    pub visits: u64,

    #[serde(rename = "pages_vues", default, deserialize_with = "lenient::count")]
    pub page_views: u64,

    #[serde(rename = "telechargements", default, deserialize_with = "lenient::count")]
    pub downloads: u64,

    /// Fraction between 0 and 1
    #[serde(rename = "taux_de_rebond", default, deserialize_with = "lenient::ratio")]
    pub bounce_rate: f64,

    #[serde(rename = "actions_moy", default, deserialize_with = "lenient::ratio")]
    pub avg_actions: f64,

    /// Free text such as "3 min 45 s"
    #[serde(rename = "duree_moyenne", default, deserialize_with = "lenient::text")]
    pub avg_duration: String,

    #[serde(flatten)]
    pub sources: TrafficSources,

    #[serde(flatten)]
    pub devices: DeviceBreakdown,
}

/// Visit counts per acquisition channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficSources {
    #[serde(rename = "moteurs_de_recherche", default, deserialize_with = "lenient::count")]
    pub search_engines: u64,

    #[serde(rename = "entrees_directes", default, deserialize_with = "lenient::count")]
    pub direct: u64,

    #[serde(rename = "sites_externes", default, deserialize_with = "lenient::count")]
    pub external_sites: u64,

    #[serde(rename = "assistants_ia", default, deserialize_with = "lenient::count")]
    pub ai_assistants: u64,

    #[serde(rename = "reseaux_sociaux", default, deserialize_with = "lenient::count")]
    pub social_networks: u64,

    #[serde(rename = "campagnes", default, deserialize_with = "lenient::count")]
    pub campaigns: u64,
}

impl TrafficSources {
    /// Saturating field-wise sum
    pub fn add(&mut self, other: &Self) {
        self.search_engines = self.search_engines.saturating_add(other.search_engines);
        self.direct = self.direct.saturating_add(other.direct);
        self.external_sites = self.external_sites.saturating_add(other.external_sites);
        self.ai_assistants = self.ai_assistants.saturating_add(other.ai_assistants);
        self.social_networks = self.social_networks.saturating_add(other.social_networks);
        self.campaigns = self.campaigns.saturating_add(other.campaigns);
    }
}

/// Visit counts per device class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceBreakdown {
    #[serde(rename = "ordinateurs", default, deserialize_with = "lenient::count")]
    pub desktop: u64,

    #[serde(rename = "smartphone", default, deserialize_with = "lenient::count")]
    pub smartphone: u64,

    #[serde(rename = "tablettes", default, deserialize_with = "lenient::count")]
    pub tablet: u64,
}

impl DeviceBreakdown {
    /// Saturating field-wise sum
    pub fn add(&mut self, other: &Self) {
        self.desktop = self.desktop.saturating_add(other.desktop);
        self.smartphone = self.smartphone.saturating_add(other.smartphone);
        self.tablet = self.tablet.saturating_add(other.tablet);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_sheet_row() {
        let row = serde_json::json!({
            "date": "2025-01",
            "visites": 600,
            "pages_vues": "1500",
            "telechargements": "",
            "taux_de_rebond": 0.42,
            "actions_moy": "2.5",
            "duree_moyenne": "3 min 45 s",
            "moteurs_de_recherche": 300,
            "entrees_directes": 200,
            "assistants_ia": 4,
            "ordinateurs": 350,
            "smartphone": 240,
            "tablettes": 10
        });

        let record: MetricRecord = serde_json::from_value(row).unwrap();
        assert_eq!(record.date, "2025-01");
        assert_eq!(record.visits, 600);
        assert_eq!(record.page_views, 1500);
        assert_eq!(record.downloads, 0);
        assert_eq!(record.avg_actions, 2.5);
        assert_eq!(record.avg_duration, "3 min 45 s");
        assert_eq!(record.sources.search_engines, 300);
        assert_eq!(record.sources.external_sites, 0);
        assert_eq!(record.sources.direct, 200);
        assert_eq!(record.sources.ai_assistants, 4);
        assert_eq!(record.devices.desktop, 350);
        assert_eq!(record.devices.tablet, 10);
    }

    #[test]
    fn test_breakdown_sums_saturate() {
        let mut sources = TrafficSources {
            direct: u64::MAX - 1,
            campaigns: 5,
            ..Default::default()
        };
        sources.add(&TrafficSources {
            direct: 10,
            campaigns: 5,
            ..Default::default()
        });
        assert_eq!(sources.direct, u64::MAX);
        assert_eq!(sources.campaigns, 10);

        let mut devices = DeviceBreakdown {
            tablet: u64::MAX,
            ..Default::default()
        };
        let same = devices;
        devices.add(&same);
        assert_eq!(devices.tablet, u64::MAX);
    }
}
