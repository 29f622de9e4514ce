//! Shared catalog snapshot and its best-effort refresh
//!
//! The snapshot has three independent slices: latest item, subscriber
//! count, and the shuffle pool. A refresh runs the data API calls in a fixed
//! order (search, statistics, then uploads only if search gave nothing);
//! every call that fails is logged and skipped, leaving its slice as it was.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::client::{format_subscriber_count, CatalogClient};
use super::pool::{VideoPool, VideoPoolEntry};
use crate::error::CatalogError;

/// Default number of search results pulled into the pool
pub const DEFAULT_SEARCH_PAGE_SIZE: u32 = 25;

/// What the site renders from
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogSnapshot {
    pub latest: Option<VideoPoolEntry>,
    /// Already formatted for display (e.g. `12.3K`)
    pub subscriber_count: Option<String>,
    pub pool: Vec<VideoPoolEntry>,
}

/// Snapshot shared between the refresher and request handlers
#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    inner: Arc<RwLock<CatalogSnapshot>>,
}

impl CatalogState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> CatalogSnapshot {
        self.inner.read().await.clone()
    }

    pub async fn latest(&self) -> Option<VideoPoolEntry> {
        self.inner.read().await.latest.clone()
    }

    pub async fn pool(&self) -> Vec<VideoPoolEntry> {
        self.inner.read().await.pool.clone()
    }

    async fn set_latest_and_pool(&self, pool: VideoPool) {
        let mut inner = self.inner.write().await;
        inner.latest = pool.entries().first().cloned();
        inner.pool = pool.entries().to_vec();
    }

    async fn set_subscriber_count(&self, formatted: String) {
        self.inner.write().await.subscriber_count = Some(formatted);
    }
}

/// Result of one data API call within a refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallOutcome {
    /// Not attempted
    Skipped,
    /// Succeeded and updated its slice
    Updated,
    /// Succeeded with nothing to show
    Empty,
    /// Failed; slice left untouched
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    pub search: CallOutcome,
    pub statistics: CallOutcome,
    pub uploads: CallOutcome,
}

impl RefreshReport {
    fn skipped() -> Self {
        Self {
            search: CallOutcome::Skipped,
            statistics: CallOutcome::Skipped,
            uploads: CallOutcome::Skipped,
        }
    }
}

/// Runs catalog refreshes when a usable credential is configured
pub struct CatalogRefresher {
    client: Option<CatalogClient>,
    search_page_size: u32,
}

impl CatalogRefresher {
    /// Without a usable credential every refresh is a no-op that sends nothing
    pub fn new(api_key: Option<&str>, base_url: &str) -> Self {
        let client = match api_key.map(|key| CatalogClient::with_base_url(key, base_url)) {
            Some(Ok(client)) => Some(client),
            Some(Err(CatalogError::MissingCredential)) | None => {
                info!("Video data API credential not configured; catalog calls disabled");
                None
            }
            Some(Err(e)) => {
                warn!("Video data API client unavailable: {}", e);
                None
            }
        };

        Self {
            client,
            search_page_size: DEFAULT_SEARCH_PAGE_SIZE,
        }
    }

    pub fn with_search_page_size(mut self, size: u32) -> Self {
        self.search_page_size = size.max(1);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    /// Refresh every slice for `channel_id`
    pub async fn refresh(&self, channel_id: &str, state: &CatalogState) -> RefreshReport {
        let Some(client) = &self.client else {
            return RefreshReport::skipped();
        };
        let channel_id = channel_id.trim();
        if channel_id.is_empty() {
            debug!("No channel id configured; skipping catalog refresh");
            return RefreshReport::skipped();
        }

        let search = match client.search_latest(channel_id, self.search_page_size).await {
            Ok(entries) if entries.is_empty() => CallOutcome::Empty,
            Ok(entries) => {
                let pool: VideoPool = entries.into_iter().collect();
                info!(items = pool.len(), "Catalog search refreshed");
                state.set_latest_and_pool(pool).await;
                CallOutcome::Updated
            }
            Err(e) => {
                warn!("Catalog search failed: {}", e);
                CallOutcome::Failed
            }
        };

        let statistics = match client.subscriber_count(channel_id).await {
            Ok(Some(count)) => {
                state.set_subscriber_count(format_subscriber_count(count)).await;
                CallOutcome::Updated
            }
            Ok(None) => CallOutcome::Empty,
            Err(e) => {
                warn!("Channel statistics failed: {}", e);
                CallOutcome::Failed
            }
        };

        let uploads = if search == CallOutcome::Updated {
            CallOutcome::Skipped
        } else {
            match client.upload_list(channel_id).await {
                Ok(entries) if entries.is_empty() => CallOutcome::Empty,
                Ok(entries) => {
                    let pool: VideoPool = entries.into_iter().collect();
                    info!(items = pool.len(), "Catalog filled from uploads list");
                    state.set_latest_and_pool(pool).await;
                    CallOutcome::Updated
                }
                Err(e) => {
                    warn!("Uploads list failed: {}", e);
                    CallOutcome::Failed
                }
            }
        };

        RefreshReport {
            search,
            statistics,
            uploads,
        }
    }
}
