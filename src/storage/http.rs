use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::{DatasetSource, SourceError, SourceResult};
use crate::models::Dataset;

/// Spreadsheet export published as JSON over HTTP
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> SourceResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl DatasetSource for HttpSource {
    async fn fetch(&self) -> SourceResult<Arc<Dataset>> {
        debug!(url = %self.url, "fetching dataset export");
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        let dataset = Dataset::from_slice(&bytes)?;
        info!(bytes = bytes.len(), "dataset export fetched");
        Ok(Arc::new(dataset))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
