use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

use super::{DatasetSource, SourceResult};
use crate::models::Dataset;

/// Export previously saved to a local file
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DatasetSource for FileSource {
    async fn fetch(&self) -> SourceResult<Arc<Dataset>> {
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(Arc::new(Dataset::from_slice(&bytes)?))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
