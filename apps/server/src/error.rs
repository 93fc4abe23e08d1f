//! API error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use quotedesk_market_data::MarketDataError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Errors surfaced to API consumers.
#[derive(Debug)]
pub enum ApiError {
    /// Resolution exhausted every stage without a result.
    NotFound(String),
    /// The upstream source failed hard. The message is passed through
    /// verbatim; this is an internal aggregation service, not a public
    /// trust boundary.
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message),
            Self::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<MarketDataError> for ApiError {
    fn from(err: MarketDataError) -> Self {
        Self::Internal(err.to_string())
    }
}
