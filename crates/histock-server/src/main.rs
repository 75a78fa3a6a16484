use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use histock_core::{MarketSymbol, ReqwestHttpClient, YahooHistoryClient};
use histock_server::{router, AppConfig, AppState};
use histock_service::{IngestPipeline, QueryService, StagingArea};
use histock_warehouse::{SeriesStore, StoreConfig};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "histock-server", version, about = "Daily market price ingestion and serving")]
struct Cli {
    /// TOML config file; built-in defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    // Reject a bad watchlist at startup, not mid-run.
    let markets = config
        .markets
        .symbols
        .iter()
        .map(|s| MarketSymbol::parse(s))
        .collect::<Result<Vec<_>, _>>()?;

    let store = SeriesStore::open(StoreConfig::new(&config.storage.db_path))?;
    let staging = StagingArea::new(&config.storage.staging_dir);
    let provider = YahooHistoryClient::new(
        Arc::new(ReqwestHttpClient::new()),
        config.storage.fetch_timeout_ms,
    );

    let shutdown = CancellationToken::new();
    let state = AppState::new(
        IngestPipeline::new(provider, staging, store.clone()),
        QueryService::new(store),
        markets,
        shutdown.clone(),
    );

    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutdown signal received");
                shutdown.cancel();
            }
        }
    });

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    info!(bind = %config.server.bind, markets = state.markets.len(), "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;

    Ok(())
}
