//! Behavior tests for the ingestion pipeline and query service.
//!
//! The provider is faked at the HTTP client seam, so every test runs
//! offline against a throwaway database and staging directory.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use histock_core::{
    HttpClient, HttpError, HttpRequest, HttpResponse, MarketSymbol, YahooHistoryClient,
};
use histock_service::{IngestError, IngestPipeline, LoadOutcome, QueryService, StagingArea};
use histock_warehouse::{SeriesStore, StoreConfig};
use tempfile::{tempdir, TempDir};
use tokio_util::sync::CancellationToken;

const AAPL_CSV: &str = "Date,Open,High,Low,Close,Adj Close,Volume\n\
    2023-01-03,130.28,130.90,124.17,125.07,125.07,112117500\n\
    2023-01-04,126.89,128.66,125.08,126.36,126.36,89113600\n";

const MSFT_CSV: &str = "Date,Open,High,Low,Close,Adj Close,Volume\n\
    2023-01-03,243.08,245.75,237.40,239.58,239.58,25740000\n";

const NOT_FOUND_BODY: &str = "404 Not Found: No data found, symbol may be delisted";

/// Serves canned series bodies keyed by symbol; unknown symbols get the
/// provider's not-found payload.
struct FakeProvider {
    series: HashMap<&'static str, &'static str>,
    fail_transport: bool,
}

impl FakeProvider {
    fn with_series(series: &[(&'static str, &'static str)]) -> Self {
        Self {
            series: series.iter().copied().collect(),
            fail_transport: false,
        }
    }

    fn failing() -> Self {
        Self {
            series: HashMap::new(),
            fail_transport: true,
        }
    }

    fn body_for(&self, url: &str) -> HttpResponse {
        for (symbol, body) in &self.series {
            if url.contains(&format!("/download/{symbol}?")) {
                return HttpResponse::ok(*body);
            }
        }
        HttpResponse::ok(NOT_FOUND_BODY)
    }
}

impl HttpClient for FakeProvider {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let response = if self.fail_transport {
            Err(HttpError::new("connection refused"))
        } else {
            Ok(self.body_for(&request.url))
        };
        Box::pin(async move { response })
    }
}

/// Serves a fixed sequence of bodies, one per request, regardless of
/// the requested symbol.
struct SequencedProvider {
    bodies: Mutex<Vec<&'static str>>,
}

impl SequencedProvider {
    fn new(bodies: &[&'static str]) -> Self {
        let mut remaining = bodies.to_vec();
        remaining.reverse();
        Self {
            bodies: Mutex::new(remaining),
        }
    }
}

impl HttpClient for SequencedProvider {
    fn execute<'a>(
        &'a self,
        _request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let body = self
            .bodies
            .lock()
            .expect("bodies should not be poisoned")
            .pop()
            .unwrap_or(NOT_FOUND_BODY);
        Box::pin(async move { Ok(HttpResponse::ok(body)) })
    }
}

struct Harness {
    pipeline: IngestPipeline,
    query: QueryService,
    staging: StagingArea,
    _temp: TempDir,
}

fn harness(provider: impl HttpClient + 'static) -> Harness {
    let temp = tempdir().expect("tempdir");
    let store =
        SeriesStore::open(StoreConfig::new(temp.path().join("histock.duckdb"))).expect("store");
    let staging = StagingArea::new(temp.path().join("market-data"));
    let client = YahooHistoryClient::new(Arc::new(provider), 5_000);
    Harness {
        pipeline: IngestPipeline::new(client, staging.clone(), store.clone()),
        query: QueryService::new(store),
        staging,
        _temp: temp,
    }
}

fn symbols(names: &[&str]) -> Vec<MarketSymbol> {
    names
        .iter()
        .map(|name| MarketSymbol::parse(name).expect("valid symbol"))
        .collect()
}

#[tokio::test]
async fn load_then_query_returns_ordered_series() {
    let h = harness(FakeProvider::with_series(&[
        ("AAPL", AAPL_CSV),
        ("MSFT", MSFT_CSV),
    ]));
    let markets = symbols(&["AAPL", "MSFT"]);

    let outcome = h
        .pipeline
        .load_all(&markets, &CancellationToken::new())
        .await
        .expect("load");
    assert_eq!(outcome, LoadOutcome::Loaded { markets: 2, rows: 3 });

    let series = h
        .query
        .market_series(&markets[0])
        .expect("query")
        .expect("loaded");
    assert_eq!(series.len(), 2);

    // Field-for-field round trip of the staged rows, order preserved.
    assert_eq!(series[0].date, "2023-01-03");
    assert_eq!(series[0].open, 130.28);
    assert_eq!(series[0].high, 130.90);
    assert_eq!(series[0].low, 124.17);
    assert_eq!(series[0].close, 125.07);
    assert_eq!(series[0].adj_close, 125.07);
    assert_eq!(series[0].volume, 112_117_500);
    assert_eq!(series[1].date, "2023-01-04");
    assert_eq!(series[1].volume, 89_113_600);
}

#[tokio::test]
async fn second_load_reports_already_loaded_and_preserves_rows() {
    let h = harness(FakeProvider::with_series(&[("AAPL", AAPL_CSV)]));
    let markets = symbols(&["AAPL"]);
    let cancel = CancellationToken::new();

    let first = h.pipeline.load_all(&markets, &cancel).await.expect("first load");
    assert!(matches!(first, LoadOutcome::Loaded { .. }));

    let second = h.pipeline.load_all(&markets, &cancel).await.expect("second load");
    assert_eq!(second, LoadOutcome::AlreadyLoaded);

    let series = h
        .query
        .market_series(&markets[0])
        .expect("query")
        .expect("loaded");
    assert_eq!(series.len(), 2, "second run must not duplicate rows");
}

#[tokio::test]
async fn query_for_never_ingested_market_returns_none() {
    let h = harness(FakeProvider::with_series(&[]));
    let market = MarketSymbol::parse("ZZZZ").expect("valid symbol");

    let result = h.query.market_series(&market).expect("soft outcome");
    assert!(result.is_none());
}

#[tokio::test]
async fn not_found_market_fails_run_without_staging_anything() {
    let h = harness(FakeProvider::with_series(&[]));
    let markets = symbols(&["ZZZZ"]);

    let error = h
        .pipeline
        .load_all(&markets, &CancellationToken::new())
        .await
        .expect_err("must fail");
    assert!(matches!(error, IngestError::MarketNotFound { market } if market == "ZZZZ"));

    // The error payload must never be checkpointed.
    assert!(!h.staging.artifact_path(&markets[0]).exists());
    assert!(h.query.market_series(&markets[0]).expect("query").is_none());
}

#[tokio::test]
async fn malformed_payload_fails_run_without_creating_a_table() {
    let h = harness(SequencedProvider::new(&["<html>gateway hiccup</html>", AAPL_CSV]));
    let markets = symbols(&["AAPL"]);
    let cancel = CancellationToken::new();

    let error = h
        .pipeline
        .load_all(&markets, &cancel)
        .await
        .expect_err("must fail");
    assert!(matches!(error, IngestError::Parse { market, .. } if market == "AAPL"));

    // No table may exist for the failed market, or every later run
    // would short-circuit to AlreadyLoaded over an empty series.
    assert!(h.query.market_series(&markets[0]).expect("query").is_none());

    let retry = h.pipeline.load_all(&markets, &cancel).await.expect("retry");
    assert_eq!(retry, LoadOutcome::Loaded { markets: 1, rows: 2 });

    let series = h
        .query
        .market_series(&markets[0])
        .expect("query")
        .expect("loaded");
    assert_eq!(series.len(), 2);
}

#[tokio::test]
async fn transport_failure_propagates_as_hard_error() {
    let h = harness(FakeProvider::failing());
    let markets = symbols(&["AAPL"]);

    let error = h
        .pipeline
        .load_all(&markets, &CancellationToken::new())
        .await
        .expect_err("must fail");
    assert!(matches!(error, IngestError::Provider(_)));
}

#[tokio::test]
async fn cancelled_run_stops_before_touching_a_market() {
    let h = harness(FakeProvider::with_series(&[("AAPL", AAPL_CSV)]));
    let markets = symbols(&["AAPL"]);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let error = h
        .pipeline
        .load_all(&markets, &cancel)
        .await
        .expect_err("must fail");
    assert!(matches!(error, IngestError::Cancelled));
    assert!(h.query.market_series(&markets[0]).expect("query").is_none());
}

#[tokio::test]
async fn staged_artifact_is_retained_after_ingestion() {
    let h = harness(FakeProvider::with_series(&[("AAPL", AAPL_CSV)]));
    let markets = symbols(&["AAPL"]);

    h.pipeline
        .load_all(&markets, &CancellationToken::new())
        .await
        .expect("load");

    let artifact = h.staging.artifact_path(&markets[0]);
    assert!(artifact.exists());
    assert_eq!(
        std::fs::read_to_string(artifact).expect("artifact readable"),
        AAPL_CSV
    );
}
