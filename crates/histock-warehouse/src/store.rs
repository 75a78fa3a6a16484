//! Per-market series storage.
//!
//! One table per market symbol, created lazily on first ingestion and
//! never dropped or rewritten by this service. The existence of a
//! market's table is the "already loaded" signal the ingestion
//! pipeline short-circuits on, so `ensure_table` reports it as a typed
//! status rather than an error.

use std::fs;
use std::path::PathBuf;

use duckdb::{Connection, ToSql};
use histock_core::{MarketSymbol, PriceRecord};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::pool::{ConnectionPool, PooledConnection};

/// Configuration for the series store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the `DuckDB` database file.
    pub db_path: PathBuf,
    /// Maximum number of connections to keep in the pool.
    pub max_pool_size: usize,
}

impl StoreConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            max_pool_size: 4,
        }
    }
}

/// Outcome of [`SeriesStore::ensure_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStatus {
    /// The table was created by this call.
    Created,
    /// The table already existed; nothing was touched.
    AlreadyExists,
}

/// Append-only, table-per-market storage for daily price series.
#[derive(Clone)]
pub struct SeriesStore {
    pool: ConnectionPool,
}

impl SeriesStore {
    /// Open the store, creating the database file's directory if needed.
    pub fn open(config: StoreConfig) -> Result<Self, StoreError> {
        if let Some(parent) = config.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let pool = ConnectionPool::new(config.db_path, config.max_pool_size);
        // Open one connection eagerly so a bad path fails at startup.
        let _ = pool.acquire()?;
        Ok(Self { pool })
    }

    /// Create the market's table unless it already exists.
    ///
    /// The check-then-create is not atomic against concurrent callers;
    /// ingestion runs are serialized by the caller's run lock.
    pub fn ensure_table(&self, market: &MarketSymbol) -> Result<TableStatus, StoreError> {
        let connection = self.pool.acquire()?;
        if table_exists(&connection, market)? {
            debug!(market = %market, "table already exists");
            return Ok(TableStatus::AlreadyExists);
        }

        // Symbol is allow-list validated (alphanumeric), safe as an identifier.
        connection.execute_batch(&format!(
            "CREATE TABLE \"{market}\" (\
             date TEXT NOT NULL, \
             open DOUBLE NOT NULL, \
             high DOUBLE NOT NULL, \
             low DOUBLE NOT NULL, \
             close DOUBLE NOT NULL, \
             adj_close DOUBLE NOT NULL, \
             volume BIGINT NOT NULL)",
        ))?;
        info!(market = %market, "created market table");
        Ok(TableStatus::Created)
    }

    /// Bulk-append records into the market's table in the given order.
    ///
    /// Fails with [`StoreError::TableMissing`] when the table has not
    /// been created via [`SeriesStore::ensure_table`].
    pub fn insert_records(
        &self,
        market: &MarketSymbol,
        records: &[PriceRecord],
    ) -> Result<usize, StoreError> {
        let connection = self.pool.acquire()?;
        if !table_exists(&connection, market)? {
            return Err(StoreError::TableMissing {
                market: market.to_string(),
            });
        }

        if records.is_empty() {
            return Ok(0);
        }

        connection.execute_batch("BEGIN TRANSACTION")?;
        let result = (|| -> Result<usize, StoreError> {
            let mut statement = connection.prepare(&format!(
                "INSERT INTO \"{market}\" \
                 (date, open, high, low, close, adj_close, volume) \
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            ))?;

            for record in records {
                let params: [&dyn ToSql; 7] = [
                    &record.date,
                    &record.open,
                    &record.high,
                    &record.low,
                    &record.close,
                    &record.adj_close,
                    &record.volume,
                ];
                statement.execute(params.as_slice())?;
            }

            Ok(records.len())
        })();

        let inserted = finalize_transaction(&connection, result)?;
        info!(market = %market, rows = inserted, "appended series rows");
        Ok(inserted)
    }

    /// Read all rows for a market in storage (insertion) order.
    pub fn read_all(&self, market: &MarketSymbol) -> Result<Vec<PriceRecord>, StoreError> {
        let connection = self.pool.acquire()?;
        if !table_exists(&connection, market)? {
            return Err(StoreError::TableMissing {
                market: market.to_string(),
            });
        }

        let mut statement = connection.prepare(&format!(
            "SELECT date, open, high, low, close, adj_close, volume FROM \"{market}\"",
        ))?;
        let rows = statement.query_map([], |row| {
            Ok(PriceRecord {
                date: row.get(0)?,
                open: row.get(1)?,
                high: row.get(2)?,
                low: row.get(3)?,
                close: row.get(4)?,
                adj_close: row.get(5)?,
                volume: row.get(6)?,
            })
        })?;

        let records = rows.collect::<Result<Vec<_>, _>>()?;
        debug!(market = %market, rows = records.len(), "read market series");
        Ok(records)
    }

    /// Number of rows stored for a market.
    pub fn row_count(&self, market: &MarketSymbol) -> Result<usize, StoreError> {
        let connection = self.pool.acquire()?;
        if !table_exists(&connection, market)? {
            return Err(StoreError::TableMissing {
                market: market.to_string(),
            });
        }

        let count: i64 = connection.query_row(
            &format!("SELECT count(*) FROM \"{market}\""),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

/// Catalog lookup for the market's table.
fn table_exists(connection: &PooledConnection, market: &MarketSymbol) -> Result<bool, StoreError> {
    let name = market.as_str();
    let params: [&dyn ToSql; 1] = [&name];
    let count: i64 = connection.query_row(
        "SELECT count(*) FROM information_schema.tables WHERE table_name = ?",
        params.as_slice(),
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Finalize a transaction, committing on success or rolling back on failure.
fn finalize_transaction<T>(
    connection: &Connection,
    result: Result<T, StoreError>,
) -> Result<T, StoreError> {
    match result {
        Ok(value) => {
            connection.execute_batch("COMMIT")?;
            Ok(value)
        }
        Err(error) => {
            let _ = connection.execute_batch("ROLLBACK");
            Err(error)
        }
    }
}
