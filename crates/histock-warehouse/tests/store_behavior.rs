//! Behavior tests for the series store.
//!
//! These verify the table-per-market lifecycle: lazy creation, the
//! already-exists signal, append order, and the missing-table failure
//! the query path relies on.

use histock_core::{MarketSymbol, PriceRecord};
use histock_warehouse::{SeriesStore, StoreConfig, StoreError, TableStatus};
use tempfile::tempdir;

fn sample_records() -> Vec<PriceRecord> {
    vec![
        PriceRecord {
            date: "2023-01-03".to_string(),
            open: 130.28,
            high: 130.90,
            low: 124.17,
            close: 125.07,
            adj_close: 125.07,
            volume: 112_117_500,
        },
        PriceRecord {
            date: "2023-01-04".to_string(),
            open: 126.89,
            high: 128.66,
            low: 125.08,
            close: 126.36,
            adj_close: 126.36,
            volume: 89_113_600,
        },
    ]
}

fn open_store(dir: &tempfile::TempDir) -> SeriesStore {
    SeriesStore::open(StoreConfig::new(dir.path().join("histock.duckdb"))).expect("store open")
}

#[test]
fn ensure_table_creates_once_then_reports_existing() {
    let temp = tempdir().expect("tempdir");
    let store = open_store(&temp);
    let market = MarketSymbol::parse("AAPL").expect("valid symbol");

    assert_eq!(
        store.ensure_table(&market).expect("first ensure"),
        TableStatus::Created
    );
    assert_eq!(
        store.ensure_table(&market).expect("second ensure"),
        TableStatus::AlreadyExists
    );
}

#[test]
fn inserted_records_round_trip_in_insertion_order() {
    let temp = tempdir().expect("tempdir");
    let store = open_store(&temp);
    let market = MarketSymbol::parse("AAPL").expect("valid symbol");
    let records = sample_records();

    store.ensure_table(&market).expect("ensure");
    let inserted = store.insert_records(&market, &records).expect("insert");
    assert_eq!(inserted, 2);

    let read_back = store.read_all(&market).expect("read");
    assert_eq!(read_back, records);
    assert_eq!(store.row_count(&market).expect("count"), 2);
}

#[test]
fn insert_without_table_fails_with_table_missing() {
    let temp = tempdir().expect("tempdir");
    let store = open_store(&temp);
    let market = MarketSymbol::parse("MSFT").expect("valid symbol");

    let error = store
        .insert_records(&market, &sample_records())
        .expect_err("must fail");
    assert!(matches!(error, StoreError::TableMissing { .. }));
}

#[test]
fn read_of_never_ingested_market_fails_with_table_missing() {
    let temp = tempdir().expect("tempdir");
    let store = open_store(&temp);
    let market = MarketSymbol::parse("ZZZZ").expect("valid symbol");

    let error = store.read_all(&market).expect_err("must fail");
    assert!(matches!(error, StoreError::TableMissing { market } if market == "ZZZZ"));
}

#[test]
fn markets_are_isolated_by_table() {
    let temp = tempdir().expect("tempdir");
    let store = open_store(&temp);
    let aapl = MarketSymbol::parse("AAPL").expect("valid symbol");
    let msft = MarketSymbol::parse("MSFT").expect("valid symbol");

    store.ensure_table(&aapl).expect("ensure aapl");
    store.insert_records(&aapl, &sample_records()).expect("insert aapl");

    store.ensure_table(&msft).expect("ensure msft");
    store
        .insert_records(&msft, &sample_records()[..1])
        .expect("insert msft");

    assert_eq!(store.row_count(&aapl).expect("count aapl"), 2);
    assert_eq!(store.row_count(&msft).expect("count msft"), 1);
}

#[test]
fn empty_batch_insert_is_a_no_op() {
    let temp = tempdir().expect("tempdir");
    let store = open_store(&temp);
    let market = MarketSymbol::parse("AAPL").expect("valid symbol");

    store.ensure_table(&market).expect("ensure");
    assert_eq!(store.insert_records(&market, &[]).expect("insert"), 0);
    assert_eq!(store.row_count(&market).expect("count"), 0);
}
