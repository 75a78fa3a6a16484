//! Ingestion pipeline: fetch → stage → store, one market at a time.
//!
//! Markets are processed sequentially in the given order; each market
//! is fully fetched, staged, and written before the next begins. The
//! one soft outcome is [`LoadOutcome::AlreadyLoaded`]: as soon as any
//! market's table turns out to pre-exist, the run stops and reports it,
//! leaving every existing row untouched. Re-running ingestion can
//! therefore never produce duplicate rows.

use histock_core::{FetchOutcome, MarketSymbol, ProviderError, YahooHistoryClient};
use histock_warehouse::{SeriesStore, StoreError, TableStatus};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::staging::{StagingArea, StagingError};

/// Terminal outcome of an ingestion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Every market in the run was fetched and stored.
    Loaded { markets: usize, rows: usize },
    /// A destination table pre-existed; the run stopped without
    /// touching any stored rows.
    AlreadyLoaded,
}

/// Unrecoverable ingestion failures.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Provider has no data for a configured market. Nothing is staged
    /// or stored for it; an error payload must never reach storage.
    #[error("provider has no data for market {market}")]
    MarketNotFound { market: String },

    #[error("failed to stage series for {market}: {source}")]
    Staging {
        market: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse staged series for {market}: {source}")]
    Parse {
        market: String,
        #[source]
        source: StagingError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("ingestion task failed: {0}")]
    Task(String),

    #[error("ingestion run cancelled")]
    Cancelled,
}

/// Orchestrates provider fetch, staging checkpoint, and storage writes.
#[derive(Clone)]
pub struct IngestPipeline {
    provider: YahooHistoryClient,
    staging: StagingArea,
    store: SeriesStore,
}

impl IngestPipeline {
    pub fn new(provider: YahooHistoryClient, staging: StagingArea, store: SeriesStore) -> Self {
        Self {
            provider,
            staging,
            store,
        }
    }

    /// Ingest the full history for every market in `markets`, in order.
    ///
    /// Cancellation is honored between markets only; a market's batch
    /// insert is never interrupted, preserving the "table exists
    /// implies fully loaded" invariant.
    pub async fn load_all(
        &self,
        markets: &[MarketSymbol],
        cancel: &CancellationToken,
    ) -> Result<LoadOutcome, IngestError> {
        let mut total_rows = 0;

        for market in markets {
            if cancel.is_cancelled() {
                warn!(market = %market, "ingestion cancelled before market");
                return Err(IngestError::Cancelled);
            }

            match self.load_market(market).await? {
                MarketLoad::Rows(rows) => total_rows += rows,
                MarketLoad::AlreadyLoaded => return Ok(LoadOutcome::AlreadyLoaded),
            }
        }

        info!(markets = markets.len(), rows = total_rows, "ingestion run complete");
        Ok(LoadOutcome::Loaded {
            markets: markets.len(),
            rows: total_rows,
        })
    }

    async fn load_market(&self, market: &MarketSymbol) -> Result<MarketLoad, IngestError> {
        let body = match self.provider.fetch_history(market).await? {
            FetchOutcome::Series(body) => body,
            FetchOutcome::NotFound => {
                return Err(IngestError::MarketNotFound {
                    market: market.to_string(),
                })
            }
        };

        // Staging and storage are synchronous file and duckdb work;
        // keep them off the async runtime.
        let staging = self.staging.clone();
        let store = self.store.clone();
        let market = market.clone();
        tokio::task::spawn_blocking(move || {
            let path = staging
                .stage(&market, &body)
                .map_err(|source| IngestError::Staging {
                    market: market.to_string(),
                    source,
                })?;

            // Parse strictly before creating the table: a payload that
            // cannot be stored must never leave an empty table behind,
            // because a table's existence means its market is fully
            // loaded.
            let records = staging
                .parse_artifact(&path)
                .map_err(|source| IngestError::Parse {
                    market: market.to_string(),
                    source,
                })?;

            if store.ensure_table(&market)? == TableStatus::AlreadyExists {
                warn!(market = %market, "market table pre-exists, reporting already loaded");
                return Ok(MarketLoad::AlreadyLoaded);
            }

            let inserted = store.insert_records(&market, &records)?;
            info!(market = %market, rows = inserted, "market ingested");
            Ok(MarketLoad::Rows(inserted))
        })
        .await
        .map_err(|error| IngestError::Task(error.to_string()))?
    }
}

/// Per-market result inside a run.
enum MarketLoad {
    Rows(usize),
    AlreadyLoaded,
}
