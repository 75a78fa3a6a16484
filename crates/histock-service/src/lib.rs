//! # Histock Service
//!
//! The ingestion pipeline and query service for histock.
//!
//! ## Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`pipeline`] | Fetch → stage → store orchestration with the run-level already-loaded short circuit |
//! | [`query`] | Projection of stored series into ordered price records |
//! | [`staging`] | Delimited-text artifact checkpointing |
//!
//! Ingestion is sequential and one-shot per market: once a market's
//! table exists it is never re-populated, so re-running a load is
//! always safe.

pub mod pipeline;
pub mod query;
pub mod staging;

pub use pipeline::{IngestError, IngestPipeline, LoadOutcome};
pub use query::QueryService;
pub use staging::{StagingArea, StagingError};
