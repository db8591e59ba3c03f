use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::models::{Dataset, DatasetError};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to fetch dataset: {0}")]
    Http(#[from] reqwest::Error),
    #[error("dataset source answered with HTTP {0}")]
    Status(u16),
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

pub type SourceResult<T> = Result<T, SourceError>;

/// Supplier of whole dataset snapshots
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Produce a complete dataset; never a partial one
    async fn fetch(&self) -> SourceResult<Arc<Dataset>>;

    /// Human readable origin, for logs
    fn describe(&self) -> String;
}
