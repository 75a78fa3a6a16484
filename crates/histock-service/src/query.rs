//! Read path: project a market's stored series into typed records.

use histock_core::{MarketSymbol, PriceRecord};
use histock_warehouse::{SeriesStore, StoreError};
use tracing::debug;

/// Read-only access to stored market series.
#[derive(Clone)]
pub struct QueryService {
    store: SeriesStore,
}

impl QueryService {
    pub fn new(store: SeriesStore) -> Self {
        Self { store }
    }

    /// All records for a market in storage order (chronological, since
    /// storage order equals provider order).
    ///
    /// A market that was never ingested is `Ok(None)`, not an error;
    /// every other storage failure propagates.
    pub fn market_series(
        &self,
        market: &MarketSymbol,
    ) -> Result<Option<Vec<PriceRecord>>, StoreError> {
        match self.store.read_all(market) {
            Ok(records) => Ok(Some(records)),
            Err(StoreError::TableMissing { .. }) => {
                debug!(market = %market, "market not loaded");
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }
}
