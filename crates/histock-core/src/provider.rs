//! Yahoo Finance daily-history provider client.
//!
//! One GET per market for the full epoch-to-now daily window. The
//! provider signals "no data for this symbol" inside the response body
//! rather than via transport failure, so that condition is surfaced as
//! a typed [`FetchOutcome::NotFound`] instead of being logged and
//! passed downstream as if it were a series.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::http_client::{HttpClient, HttpError, HttpRequest};
use crate::MarketSymbol;

const DOWNLOAD_BASE: &str = "https://query1.finance.yahoo.com/v7/finance/download";

/// Marker the provider embeds in the body of a no-data response.
const NOT_FOUND_MARKER: &str = "404 Not Found: No data found";

/// Result of a history fetch that reached the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Raw full-history series body, untouched.
    Series(String),
    /// Provider has no data for the symbol (delisted or unknown).
    NotFound,
}

/// Failures the provider client does not recover from.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider transport error: {0}")]
    Transport(String),

    #[error("provider returned status {status}")]
    UpstreamStatus { status: u16 },
}

impl From<HttpError> for ProviderError {
    fn from(error: HttpError) -> Self {
        Self::Transport(error.message().to_owned())
    }
}

/// Client for the provider's full-history download endpoint.
#[derive(Clone)]
pub struct YahooHistoryClient {
    http_client: Arc<dyn HttpClient>,
    timeout_ms: u64,
}

impl YahooHistoryClient {
    pub fn new(http_client: Arc<dyn HttpClient>, timeout_ms: u64) -> Self {
        Self {
            http_client,
            timeout_ms,
        }
    }

    /// Fetch a market's entire daily history.
    ///
    /// A not-found payload is a typed outcome, not an error; only
    /// transport-level failures and unexpected upstream statuses fail.
    pub async fn fetch_history(
        &self,
        market: &MarketSymbol,
    ) -> Result<FetchOutcome, ProviderError> {
        let url = format!(
            "{DOWNLOAD_BASE}/{}?period1=0&period2=9999999999&interval=1d&events=history&includeAdjustedClose=true",
            urlencoding::encode(market.as_str())
        );

        let request = HttpRequest::get(url).with_timeout_ms(self.timeout_ms);
        let response = self.http_client.execute(request).await?;

        if response.is_not_found() || response.body.contains(NOT_FOUND_MARKER) {
            warn!(market = %market, "provider has no data for symbol");
            return Ok(FetchOutcome::NotFound);
        }

        if !response.is_success() {
            return Err(ProviderError::UpstreamStatus {
                status: response.status,
            });
        }

        debug!(market = %market, bytes = response.body.len(), "fetched full history");
        Ok(FetchOutcome::Series(response.body))
    }
}
