use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::models::Dataset;

/// A loaded dataset and the cache month it was loaded for
#[derive(Debug)]
pub struct Snapshot {
    pub dataset: Arc<Dataset>,
    pub month: String,
    pub loaded_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(dataset: Arc<Dataset>, month: impl Into<String>) -> Self {
        Self {
            dataset,
            month: month.into(),
            loaded_at: Utc::now(),
        }
    }
}

/// Holder of the current snapshot
///
/// Only the top-level reference is ever reassigned, so a reader sees either
/// the previous snapshot or the new one in full.
#[derive(Default)]
pub struct RecordStore {
    current: RwLock<Option<Arc<Snapshot>>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.current.read().await.clone()
    }

    pub async fn replace(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        info!(month = %snapshot.month, "replacing dataset snapshot");
        *self.current.write().await = Some(Arc::clone(&snapshot));
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replace_swaps_whole_snapshot() {
        let store = RecordStore::new();
        assert!(store.snapshot().await.is_none());

        let first = Arc::new(Dataset::default());
        store.replace(Snapshot::new(Arc::clone(&first), "2026-09")).await;
        let held = store.snapshot().await.unwrap();

        store.replace(Snapshot::new(Arc::new(Dataset::default()), "2026-10")).await;

        // Readers holding the old snapshot keep it intact
        assert_eq!(held.month, "2026-09");
        assert!(Arc::ptr_eq(&held.dataset, &first));
        assert_eq!(store.snapshot().await.unwrap().month, "2026-10");
    }
}
