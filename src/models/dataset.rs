//! Fetched dataset snapshot
//!
//! The export is a map of sheet name to `{ rows: [...] }`. Every sheet is a
//! metric collection except the reserved top-pages sheet, which holds the
//! page rows of all sites combined.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::warn;

use super::{MetricRecord, PageRecord};

/// Sheet name holding page rows for every site
pub const TOP_PAGES_COLLECTION: &str = "Top Pages";

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("malformed dataset: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    collections: BTreeMap<String, Vec<MetricRecord>>,
    pages: Vec<PageRecord>,
}

#[derive(Deserialize)]
struct RawDataset<T> {
    #[serde(default = "BTreeMap::new")]
    sheets: BTreeMap<String, RawSheet<T>>,
}

#[derive(Serialize, Deserialize)]
struct RawSheet<T> {
    #[serde(default = "Vec::new")]
    rows: Vec<T>,
}

/// Decode rows one by one so a single non-object row does not sink the sheet
fn decode_rows<T: DeserializeOwned>(sheet: &str, rows: Vec<Value>) -> Vec<T> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value(row) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!(sheet, index, error = %e, "skipping undecodable row");
                None
            }
        })
        .collect()
}

impl Dataset {
    pub fn new(collections: BTreeMap<String, Vec<MetricRecord>>, pages: Vec<PageRecord>) -> Self {
        Self { collections, pages }
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, DatasetError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn from_value(value: Value) -> Result<Self, DatasetError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Rows of a metric collection, empty when the collection is unknown
    pub fn rows(&self, collection: &str) -> &[MetricRecord] {
        self.collections
            .get(collection)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Page rows of every site
    pub fn pages(&self) -> &[PageRecord] {
        &self.pages
    }

    pub fn collection_names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty() && self.collections.values().all(Vec::is_empty)
    }
}

impl<'de> Deserialize<'de> for Dataset {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawDataset::<Value>::deserialize(deserializer)?;

        let mut collections = BTreeMap::new();
        let mut pages = Vec::new();
        for (name, sheet) in raw.sheets {
            if name == TOP_PAGES_COLLECTION {
                pages = decode_rows(&name, sheet.rows);
            } else {
                let rows = decode_rows(&name, sheet.rows);
                collections.insert(name, rows);
            }
        }

        Ok(Self { collections, pages })
    }
}

impl Serialize for Dataset {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        #[derive(Serialize)]
        #[serde(untagged)]
        enum SheetRef<'a> {
            Metrics(RawSheet<&'a MetricRecord>),
            Pages(RawSheet<&'a PageRecord>),
        }

        #[derive(Serialize)]
        struct SheetsRef<'a> {
            sheets: BTreeMap<&'a str, SheetRef<'a>>,
        }

        let mut sheets: BTreeMap<&str, SheetRef<'_>> = self
            .collections
            .iter()
            .map(|(name, rows)| {
                let sheet = RawSheet {
                    rows: rows.iter().collect(),
                };
                (name.as_str(), SheetRef::Metrics(sheet))
            })
            .collect();
        sheets.insert(
            TOP_PAGES_COLLECTION,
            SheetRef::Pages(RawSheet {
                rows: self.pages.iter().collect(),
            }),
        );

        SheetsRef { sheets }.serialize(serializer)
    }
}
