use thiserror::Error;

/// Errors that can occur during series store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `DuckDB` database error.
    #[error(transparent)]
    DuckDb(#[from] duckdb::Error),

    /// I/O error (file system operations).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The market's table does not exist (market never ingested).
    #[error("no table for market {market}")]
    TableMissing { market: String },
}
