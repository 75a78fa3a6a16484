//! # Histock Warehouse
//!
//! `DuckDB`-based storage layer for histock daily price series.
//!
//! ## Overview
//!
//! One durable database file, one table per market symbol. Tables are
//! created lazily on first ingestion and never dropped, migrated, or
//! rewritten by this service; a table's existence is the signal that
//! its market is fully loaded.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use histock_core::MarketSymbol;
//! use histock_warehouse::{SeriesStore, StoreConfig, TableStatus};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = SeriesStore::open(StoreConfig::new("data/histock.duckdb"))?;
//!     let market = MarketSymbol::parse("AAPL")?;
//!
//!     match store.ensure_table(&market)? {
//!         TableStatus::Created => { /* first ingestion, proceed */ }
//!         TableStatus::AlreadyExists => { /* already loaded */ }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Security
//!
//! Row values are bound as query parameters. Table identifiers are the
//! one interpolated piece, and they only ever come from
//! [`histock_core::MarketSymbol`], which rejects anything outside a
//! strict alphanumeric allow-list.

pub mod error;
pub mod pool;
pub mod store;

pub use error::StoreError;
pub use pool::{ConnectionPool, PooledConnection};
pub use store::{SeriesStore, StoreConfig, TableStatus};
