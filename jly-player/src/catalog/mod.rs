//! Video catalog: data API client, shuffle pool, and the shared snapshot
//! the site renders from

pub mod client;
pub mod pool;
pub mod state;

pub use client::{display_title, format_subscriber_count, CatalogClient, YOUTUBE_API_BASE};
pub use pool::{VideoPool, VideoPoolEntry};
pub use state::{CallOutcome, CatalogRefresher, CatalogSnapshot, CatalogState, RefreshReport};
