use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::config::SiteConfig;
use crate::report::{self, DashboardView, PeriodOptions, ViewError, ViewOptions};
use crate::storage::{current_month, CachedSource, RecordStore, Snapshot, SourceError};

pub struct AppState {
    pub store: RecordStore,
    pub source: Arc<CachedSource>,
    pub sites: Vec<SiteConfig>,
    pub options: ViewOptions,
    /// Cache month of "now"; swapped out in tests
    pub clock: fn() -> String,
}

impl AppState {
    pub fn new(source: Arc<CachedSource>, sites: Vec<SiteConfig>, options: ViewOptions) -> Self {
        Self {
            store: RecordStore::new(),
            source,
            sites,
            options,
            clock: current_month,
        }
    }

    /// Load the dataset for the current month into the store
    pub async fn load(&self) -> Result<Arc<Snapshot>, SourceError> {
        let month = (self.clock)();
        let dataset = self.source.load_for(&month).await?;
        Ok(self.store.replace(Snapshot::new(dataset, month)).await)
    }

    /// Discard every cached copy and load a fresh dataset
    pub async fn refresh(&self) -> Result<Arc<Snapshot>, SourceError> {
        let month = (self.clock)();
        let dataset = self.source.refresh_for(&month).await?;
        Ok(self.store.replace(Snapshot::new(dataset, month)).await)
    }

    /// Current snapshot, reloaded first when the month has rolled over
    pub async fn snapshot(&self) -> Result<Arc<Snapshot>, ApiFailure> {
        match self.store.snapshot().await {
            Some(snapshot) if snapshot.month == (self.clock)() => Ok(snapshot),
            Some(stale) => {
                tracing::info!(month = %stale.month, "dataset snapshot is stale, reloading");
                self.load().await.map_err(source_failure)
            }
            None => Err(failure(
                StatusCode::SERVICE_UNAVAILABLE,
                "Dataset not loaded".to_string(),
            )),
        }
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct RefreshResponse {
    pub month: String,
    pub loaded_at: DateTime<Utc>,
}

pub type ApiFailure = (StatusCode, Json<ErrorResponse>);

fn failure(status: StatusCode, error: String) -> ApiFailure {
    (status, Json(ErrorResponse { error }))
}

fn view_failure(e: ViewError) -> ApiFailure {
    let status = match &e {
        ViewError::UnknownSite(_) => StatusCode::NOT_FOUND,
        ViewError::InvalidPeriod(_) => StatusCode::BAD_REQUEST,
    };
    failure(status, e.to_string())
}

fn source_failure(e: SourceError) -> ApiFailure {
    tracing::error!("Failed to load dataset: {}", e);
    failure(StatusCode::BAD_GATEWAY, format!("Failed to load dataset: {}", e))
}

pub async fn health_check() -> &'static str {
    "OK"
}

/// List configured sites
pub async fn list_sites(State(state): State<Arc<AppState>>) -> Json<Vec<SiteConfig>> {
    Json(state.sites.clone())
}

/// Selectable periods for a site
pub async fn get_periods(
    State(state): State<Arc<AppState>>,
    Path(tag): Path<String>,
) -> Result<Json<PeriodOptions>, ApiFailure> {
    let snapshot = state.snapshot().await?;
    report::periods_for(&snapshot.dataset, &state.sites, &tag)
        .map(Json)
        .map_err(view_failure)
}

/// Month or year view, inferred from the period token
pub async fn get_view(
    State(state): State<Arc<AppState>>,
    Path((tag, period)): Path<(String, String)>,
) -> Result<Json<DashboardView>, ApiFailure> {
    let snapshot = state.snapshot().await?;
    report::view_for(&snapshot.dataset, &state.sites, &tag, &period, &state.options)
        .map(Json)
        .map_err(view_failure)
}

/// Refetch the dataset, bypassing every cache layer
pub async fn refresh(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RefreshResponse>, ApiFailure> {
    let snapshot = state.refresh().await.map_err(source_failure)?;
    Ok(Json(RefreshResponse {
        month: snapshot.month.clone(),
        loaded_at: snapshot.loaded_at,
    }))
}
