use async_trait::async_trait;
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{DatasetSource, SourceResult};
use crate::models::Dataset;

/// Calendar month used as the cache key, `YYYY-MM` in local time
pub fn current_month() -> String {
    chrono::Local::now().format("%Y-%m").to_string()
}

#[derive(Deserialize)]
struct CacheEnvelope {
    month: String,
    dataset: Dataset,
}

#[derive(Serialize)]
struct CacheEnvelopeRef<'a> {
    month: &'a str,
    dataset: &'a Dataset,
}

/// Cached source wrapper with monthly invalidation
///
/// A dataset is reused until the wall-clock month changes. Lookups go
/// memory, then the on-disk envelope, then the wrapped source.
pub struct CachedSource {
    /// Underlying source
    inner: Arc<dyn DatasetSource>,
    /// In-memory layer keyed by month (Moka cache)
    memory: Cache<String, Arc<Dataset>>,
    /// On-disk layer; disabled when `None`
    disk_path: Option<PathBuf>,
}

impl CachedSource {
    pub fn new(inner: Arc<dyn DatasetSource>, disk_path: Option<PathBuf>) -> Self {
        let memory = Cache::builder().max_capacity(2).build();

        Self {
            inner,
            memory,
            disk_path,
        }
    }

    /// Dataset for the given cache month, fetching only on a miss
    pub async fn load_for(&self, month: &str) -> SourceResult<Arc<Dataset>> {
        if let Some(cached) = self.memory.get(month).await {
            debug!(month, "dataset served from memory cache");
            return Ok(cached);
        }

        // Anything still in memory belongs to an older month
        self.memory.invalidate_all();

        if let Some(dataset) = self.read_disk(month).await {
            info!(month, "dataset served from disk cache");
            self.memory.insert(month.to_string(), Arc::clone(&dataset)).await;
            return Ok(dataset);
        }

        self.fetch_and_store(month).await
    }

    /// Drop both cache layers and fetch again
    pub async fn refresh_for(&self, month: &str) -> SourceResult<Arc<Dataset>> {
        info!(month, source = %self.inner.describe(), "refreshing dataset");
        self.memory.invalidate_all();
        self.remove_disk().await;
        self.fetch_and_store(month).await
    }

    async fn fetch_and_store(&self, month: &str) -> SourceResult<Arc<Dataset>> {
        let dataset = self.inner.fetch().await?;
        self.memory.insert(month.to_string(), Arc::clone(&dataset)).await;
        self.write_disk(month, &dataset).await;
        Ok(dataset)
    }

    async fn read_disk(&self, month: &str) -> Option<Arc<Dataset>> {
        let path = self.disk_path.as_ref()?;

        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read dataset cache");
                return None;
            }
        };

        let envelope: CacheEnvelope = match serde_json::from_slice(&bytes) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable dataset cache");
                return None;
            }
        };

        if envelope.month != month {
            info!(cached = %envelope.month, month, "discarding dataset cache from another month");
            self.remove_disk().await;
            return None;
        }

        Some(Arc::new(envelope.dataset))
    }

    async fn write_disk(&self, month: &str, dataset: &Dataset) {
        let Some(path) = self.disk_path.as_ref() else {
            return;
        };

        let bytes = match serde_json::to_vec(&CacheEnvelopeRef { month, dataset }) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "failed to encode dataset cache");
                return;
            }
        };

        // Write beside the target, then rename over it
        let tmp = path.with_extension("tmp");
        let result = match tokio::fs::write(&tmp, &bytes).await {
            Ok(()) => tokio::fs::rename(&tmp, path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            warn!(path = %path.display(), error = %e, "failed to write dataset cache");
        }
    }

    async fn remove_disk(&self) {
        let Some(path) = self.disk_path.as_ref() else {
            return;
        };
        if let Err(e) = tokio::fs::remove_file(path).await {
            if e.kind() != ErrorKind::NotFound {
                warn!(path = %path.display(), error = %e, "failed to remove dataset cache");
            }
        }
    }
}

#[async_trait]
impl DatasetSource for CachedSource {
    async fn fetch(&self) -> SourceResult<Arc<Dataset>> {
        self.load_for(&current_month()).await
    }

    fn describe(&self) -> String {
        format!("cached {}", self.inner.describe())
    }
}
