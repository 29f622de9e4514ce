//! Video platform data API client
//!
//! Three read-only calls: newest uploads by search, channel statistics, and
//! the channel's uploads playlist. Each returns its own error; callers decide
//! what a failure means.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use super::pool::VideoPoolEntry;
use crate::error::CatalogError;
use jly_common::config::is_usable_api_key;

pub const YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";
const USER_AGENT: &str = concat!("jly-site/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 10;
const UPLOADS_PAGE_SIZE: u32 = 50;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
struct ChannelsResponse {
    #[serde(default)]
    items: Vec<ChannelItem>,
}

#[derive(Debug, Deserialize)]
struct ChannelItem {
    statistics: ChannelStatistics,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelStatistics {
    /// The API sends counts as decimal strings
    subscriber_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItemsResponse {
    #[serde(default)]
    items: Vec<PlaylistItem>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    snippet: PlaylistSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistSnippet {
    #[serde(default)]
    title: String,
    resource_id: ResourceId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    video_id: Option<String>,
}

/// Data API client bound to one credential
pub struct CatalogClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl CatalogClient {
    /// Build a client against the public API
    ///
    /// Fails with `MissingCredential` for blank or template credentials, so
    /// no request is ever sent with them.
    pub fn new(api_key: &str) -> Result<Self, CatalogError> {
        Self::with_base_url(api_key, YOUTUBE_API_BASE)
    }

    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self, CatalogError> {
        if !is_usable_api_key(api_key) {
            return Err(CatalogError::MissingCredential);
        }

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.trim().to_string(),
        })
    }

    /// Newest videos on the channel, newest first
    pub async fn search_latest(
        &self,
        channel_id: &str,
        max_results: u32,
    ) -> Result<Vec<VideoPoolEntry>, CatalogError> {
        let max_results = max_results.to_string();
        let response: SearchResponse = self
            .get_json(
                "search",
                &[
                    ("channelId", channel_id),
                    ("part", "snippet,id"),
                    ("order", "date"),
                    ("maxResults", &max_results),
                    ("type", "video"),
                ],
            )
            .await?;

        Ok(response
            .items
            .into_iter()
            .filter_map(|item| {
                item.id
                    .video_id
                    .map(|id| VideoPoolEntry::new(id, display_title(&item.snippet.title)))
            })
            .collect())
    }

    /// Subscriber count, when the channel exposes it
    pub async fn subscriber_count(&self, channel_id: &str) -> Result<Option<u64>, CatalogError> {
        let response: ChannelsResponse = self
            .get_json("channels", &[("id", channel_id), ("part", "statistics")])
            .await?;

        let Some(raw) = response
            .items
            .into_iter()
            .next()
            .and_then(|item| item.statistics.subscriber_count)
        else {
            return Ok(None);
        };

        raw.parse::<u64>()
            .map(Some)
            .map_err(|e| CatalogError::ParseError(format!("subscriberCount {:?}: {}", raw, e)))
    }

    /// Most recent entries of the channel's uploads playlist
    pub async fn upload_list(&self, channel_id: &str) -> Result<Vec<VideoPoolEntry>, CatalogError> {
        let playlist_id = uploads_playlist_id(channel_id).ok_or_else(|| {
            CatalogError::ParseError(format!("no uploads playlist for channel {:?}", channel_id))
        })?;
        let page_size = UPLOADS_PAGE_SIZE.to_string();

        let response: PlaylistItemsResponse = self
            .get_json(
                "playlistItems",
                &[
                    ("playlistId", playlist_id.as_str()),
                    ("part", "snippet"),
                    ("maxResults", &page_size),
                ],
            )
            .await?;

        Ok(response
            .items
            .into_iter()
            .filter_map(|item| {
                let title = display_title(&item.snippet.title);
                item.snippet
                    .resource_id
                    .video_id
                    .map(|id| VideoPoolEntry::new(id, title))
            })
            .collect())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, CatalogError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        tracing::debug!(endpoint, "Querying video data API");

        let response = self
            .http_client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CatalogError::ApiError(status.as_u16(), error_text));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::ParseError(e.to_string()))
    }
}

/// Uploads playlist id for a `UC...` channel id
fn uploads_playlist_id(channel_id: &str) -> Option<String> {
    channel_id
        .trim()
        .strip_prefix("UC")
        .filter(|rest| !rest.is_empty())
        .map(|rest| format!("UU{}", rest))
}

/// Title shown on the site: everything before the first `" ("`
pub fn display_title(raw: &str) -> String {
    raw.split(" (").next().unwrap_or(raw).to_string()
}

/// `1234` -> `1.2K`; counts under a thousand stay as-is
///
/// Halves round up (`1250` -> `1.3K`).
pub fn format_subscriber_count(count: u64) -> String {
    if count >= 1000 {
        let tenths = (count + 50) / 100;
        format!("{}.{}K", tenths / 10, tenths % 10)
    } else {
        count.to_string()
    }
}
