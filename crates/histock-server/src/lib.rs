//! HTTP front door for the histock ingestion-and-serving service.
//!
//! Thin pass-through layer: routes translate pipeline and query
//! outcomes into JSON responses, nothing more.
//!
//! | Module | Responsibility |
//! |---|---|
//! | [`config`] | TOML process configuration |
//! | [`error`] | HTTP error envelope |
//! | [`routes`] | axum router and handlers |
//! | [`state`] | shared handler state |

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::{AppConfig, ConfigError};
pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
