//! Background catalog refresh
//!
//! Runs once at startup, then on the configured interval until cancelled.
//! The channel id is re-read from the site config on every pass so an
//! edited document takes effect without a restart.

use jly_common::site::load_site_config;
use jly_player::catalog::{CatalogRefresher, CatalogState};
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub fn spawn_catalog_refresh(
    refresher: CatalogRefresher,
    catalog: CatalogState,
    site_config_path: PathBuf,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if !refresher.is_enabled() {
            info!("Catalog refresh disabled; latest-release links fall back to the channel page");
            return;
        }

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let channel_id = match load_site_config(&site_config_path).await {
                        Ok(config) => config.youtube.channel_id,
                        Err(e) => {
                            warn!("Catalog refresh skipped; site config unavailable: {}", e);
                            continue;
                        }
                    };
                    let report = refresher.refresh(&channel_id, &catalog).await;
                    debug!(?report, "Catalog refresh pass finished");
                }
            }
        }
        debug!("Catalog refresh task stopped");
    })
}
