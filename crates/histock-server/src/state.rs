use std::sync::Arc;

use histock_core::MarketSymbol;
use histock_service::{IngestPipeline, QueryService};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Shared handler state.
///
/// The ingest lock serializes load runs: a second `/load-data` request
/// while one is in flight gets an immediate busy response instead of
/// queueing behind the first.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<IngestPipeline>,
    pub query: QueryService,
    pub markets: Arc<Vec<MarketSymbol>>,
    pub ingest_lock: Arc<Mutex<()>>,
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(
        pipeline: IngestPipeline,
        query: QueryService,
        markets: Vec<MarketSymbol>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            query,
            markets: Arc::new(markets),
            ingest_lock: Arc::new(Mutex::new(())),
            shutdown,
        }
    }
}
