use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Process configuration, loaded from a TOML file at startup.
///
/// Every section has defaults so the server runs with no config file at
/// all: localhost bind, `./data` storage, and a small demo watchlist.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub markets: MarketsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            markets: MarketsConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub db_path: PathBuf,
    pub staging_dir: PathBuf,
    pub fetch_timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("data/histock.duckdb"),
            staging_dir: PathBuf::from("data/market-data"),
            fetch_timeout_ms: 30_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarketsConfig {
    pub symbols: Vec<String>,
}

impl Default for MarketsConfig {
    fn default() -> Self {
        Self {
            symbols: vec!["AAPL".to_string(), "MSFT".to_string(), "GOOG".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: AppConfig = toml::from_str("[server]\nbind = \"0.0.0.0:9000\"\n")
            .expect("valid config");

        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(config.storage.fetch_timeout_ms, 30_000);
        assert!(!config.markets.symbols.is_empty());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<AppConfig, _> = toml::from_str("[server]\nhost = \"oops\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn full_config_round_trips() {
        let raw = r#"
            [server]
            bind = "0.0.0.0:8080"

            [storage]
            db_path = "/var/lib/histock/prices.duckdb"
            staging_dir = "/var/lib/histock/staging"
            fetch_timeout_ms = 10000

            [markets]
            symbols = ["AAPL", "TSLA"]
        "#;
        let config: AppConfig = toml::from_str(raw).expect("valid config");

        assert_eq!(config.storage.db_path, PathBuf::from("/var/lib/histock/prices.duckdb"));
        assert_eq!(config.storage.fetch_timeout_ms, 10_000);
        assert_eq!(config.markets.symbols, vec!["AAPL", "TSLA"]);
    }
}
