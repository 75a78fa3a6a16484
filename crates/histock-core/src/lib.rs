//! # Histock Core
//!
//! Domain contracts for the histock market-history service.
//!
//! ## Overview
//!
//! This crate provides the foundational pieces shared by the ingestion
//! pipeline and the query surface:
//!
//! - **Validated market symbols** safe to embed in provider URLs and
//!   storage table identifiers
//! - **Price records** and the delimited-text series codec
//! - **HTTP client abstraction** so provider calls are testable offline
//! - **Provider client** for the full-history download endpoint
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Validation error types |
//! | [`http_client`] | HTTP client abstraction |
//! | [`provider`] | Yahoo daily-history client |
//! | [`series`] | Price record and series codec |
//! | [`symbol`] | Validated market symbol |

pub mod error;
pub mod http_client;
pub mod provider;
pub mod series;
pub mod symbol;

pub use error::ValidationError;
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient};
pub use provider::{FetchOutcome, ProviderError, YahooHistoryClient};
pub use series::{parse_series, PriceRecord, SeriesError, SERIES_HEADER};
pub use symbol::MarketSymbol;
