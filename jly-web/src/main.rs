//! jly-web - artist site server
//!
//! Serves the landing, gallery and admin pages, the site config document,
//! crawler artifacts and the player session API, and keeps the video
//! catalog snapshot fresh in the background.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use jly_common::config::{load_settings_file, Environment};
use jly_player::catalog::{CatalogRefresher, YOUTUBE_API_BASE};
use jly_player::CatalogState;
use jly_web::config::{log_filter, CliOverrides, ServerConfig};
use jly_web::refresh::spawn_catalog_refresh;
use jly_web::{build_router, AppState};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for jly-web
#[derive(Parser, Debug)]
#[command(name = "jly-web")]
#[command(about = "Artist link-in-bio site server")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "JLY_PORT")]
    port: Option<u16>,

    /// Address to bind
    #[arg(long, env = "JLY_BIND")]
    bind: Option<IpAddr>,

    /// Static asset root containing site-config.json
    #[arg(long, env = "JLY_PUBLIC_DIR")]
    public_dir: Option<PathBuf>,

    /// Canonical site origin for sitemap and OpenGraph URLs
    #[arg(long, env = "JLY_SITE_URL")]
    site_url: Option<String>,

    /// development or production (admin editor only in development)
    #[arg(long, env = "JLY_ENV")]
    environment: Option<Environment>,

    /// Video data API credential
    #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    youtube_api_key: Option<String>,

    /// Settings file (default: ~/.config/jly/jly-web.toml)
    #[arg(short, long, env = "JLY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Read before tracing init: the file can set the log level.
    let settings = load_settings_file(args.config.as_deref()).context("Failed to load settings")?;
    let toml = settings.config;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(log_filter(&toml)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting jly-web v{}", env!("CARGO_PKG_VERSION"));
    match &settings.source {
        Some(path) => info!("Settings loaded from {}", path.display()),
        None => info!("No settings file found; using defaults"),
    }

    let config = ServerConfig::resolve(
        CliOverrides {
            bind_addr: args.bind,
            port: args.port,
            public_dir: args.public_dir,
            site_url: args.site_url,
            environment: args.environment,
            youtube_api_key: args.youtube_api_key,
        },
        &toml,
    );

    if !config.site_config_path().exists() {
        tracing::warn!(
            "Site config not found at {}; pages will show the load error banner",
            config.site_config_path().display()
        );
    }
    if config.environment.is_development() {
        info!("Admin editor enabled at /admin");
    }

    let catalog = CatalogState::new();
    let refresher = CatalogRefresher::new(config.youtube_api_key.as_deref(), YOUTUBE_API_BASE);
    let shutdown = CancellationToken::new();
    let refresh_task = spawn_catalog_refresh(
        refresher,
        catalog.clone(),
        config.site_config_path(),
        config.catalog_refresh,
        shutdown.clone(),
    );

    let addr = SocketAddr::new(config.bind_addr, config.port);
    let state = AppState::new(config, catalog);
    let players = state.players.clone();
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("jly-web listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    // Open event streams end once their sessions close, so sessions are
    // closed before the server waits on in-flight connections.
    let stop = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            stop.cancel();
            players.close_all().await;
        })
        .await
        .context("Server error")?;

    shutdown.cancel();
    let _ = refresh_task.await;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
