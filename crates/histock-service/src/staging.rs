//! Staging artifact management.
//!
//! The raw provider body is checkpointed to disk before parsing, one
//! delimited-text file per market. Artifacts are retained after
//! ingestion as an audit/re-import trail; nothing cleans them up.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use histock_core::{parse_series, MarketSymbol, PriceRecord, SeriesError};
use tracing::info;

/// Working directory holding one staged series artifact per market.
#[derive(Debug, Clone)]
pub struct StagingArea {
    dir: PathBuf,
}

impl StagingArea {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path the market's artifact is staged at.
    pub fn artifact_path(&self, market: &MarketSymbol) -> PathBuf {
        self.dir.join(format!("{market}.csv"))
    }

    /// Write the raw series body to the market's artifact file.
    pub fn stage(&self, market: &MarketSymbol, body: &str) -> Result<PathBuf, std::io::Error> {
        fs::create_dir_all(&self.dir)?;
        let path = self.artifact_path(market);
        fs::write(&path, body)?;
        info!(market = %market, path = %path.display(), "staged raw series");
        Ok(path)
    }

    /// Re-parse a staged artifact into typed price records.
    pub fn parse_artifact(&self, path: &Path) -> Result<Vec<PriceRecord>, StagingError> {
        let file = File::open(path)?;
        Ok(parse_series(BufReader::new(file))?)
    }
}

/// Errors reading a staged artifact back into records.
#[derive(Debug, thiserror::Error)]
pub enum StagingError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Series(#[from] SeriesError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const FIXTURE: &str = "Date,Open,High,Low,Close,Adj Close,Volume\n\
        2023-01-03,130.28,130.90,124.17,125.07,125.07,112117500\n";

    #[test]
    fn stage_then_parse_round_trips() {
        let temp = tempdir().expect("tempdir");
        let staging = StagingArea::new(temp.path().join("market-data"));
        let market = MarketSymbol::parse("AAPL").expect("valid symbol");

        let path = staging.stage(&market, FIXTURE).expect("stage");
        assert_eq!(path, staging.artifact_path(&market));
        assert_eq!(fs::read_to_string(&path).expect("read back"), FIXTURE);

        let records = staging.parse_artifact(&path).expect("parse");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, "2023-01-03");
    }

    #[test]
    fn staging_creates_the_working_directory() {
        let temp = tempdir().expect("tempdir");
        let nested = temp.path().join("a").join("b");
        let staging = StagingArea::new(&nested);
        let market = MarketSymbol::parse("MSFT").expect("valid symbol");

        staging.stage(&market, FIXTURE).expect("stage");
        assert!(nested.join("MSFT.csv").exists());
    }
}
