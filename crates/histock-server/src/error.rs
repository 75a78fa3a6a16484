use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use histock_core::ValidationError;
use histock_service::IngestError;
use serde_json::json;
use thiserror::Error;

/// Errors rendered to HTTP clients as `{"code", "message"}` JSON.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    InvalidSymbol(#[from] ValidationError),
    #[error("no data loaded for market '{market}'")]
    NotLoaded { market: String },
    #[error("a data load is already in progress")]
    IngestBusy,
    #[error("upstream provider failure: {0}")]
    Upstream(String),
    #[error("server is shutting down")]
    ShuttingDown,
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidSymbol(_) => StatusCode::BAD_REQUEST,
            Self::NotLoaded { .. } => StatusCode::NOT_FOUND,
            Self::IngestBusy => StatusCode::CONFLICT,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::ShuttingDown => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::InvalidSymbol(_) => "INVALID_SYMBOL",
            Self::NotLoaded { .. } => "NOT_LOADED",
            Self::IngestBusy => "INGEST_BUSY",
            Self::Upstream(_) => "UPSTREAM",
            Self::ShuttingDown => "SHUTTING_DOWN",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "request failed");
        }
        let body = json!({
            "code": self.code(),
            "message": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

impl From<IngestError> for ApiError {
    fn from(error: IngestError) -> Self {
        match error {
            IngestError::Provider(e) => Self::Upstream(e.to_string()),
            IngestError::MarketNotFound { market } => {
                Self::Upstream(format!("provider has no data for market '{market}'"))
            }
            IngestError::Cancelled => Self::ShuttingDown,
            other => Self::Internal(other.to_string()),
        }
    }
}
