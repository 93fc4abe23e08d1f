use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};

use quotedesk_market_data::{run_batch, QuoteRecord};

use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;
use crate::models::{BatchQuoteRequest, BatchQuoteResponse, QuoteErrorItem};

async fn get_quote(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> ApiResult<Json<QuoteRecord>> {
    match state.engine.get_quote(&symbol).await? {
        Some(quote) => Ok(Json(quote)),
        None => Err(ApiError::NotFound(format!(
            "No quote found for symbol: {}",
            symbol
        ))),
    }
}

async fn batch_quotes(
    State(state): State<Arc<AppState>>,
    Json(body): Json<BatchQuoteRequest>,
) -> Json<BatchQuoteResponse> {
    let engine = state.engine.clone();
    let outcome = run_batch(body.symbols, "No quote data available", move |symbol| {
        let engine = engine.clone();
        async move { engine.get_quote(&symbol).await }
    })
    .await;

    Json(BatchQuoteResponse {
        results: outcome.results,
        errors: outcome
            .errors
            .into_iter()
            .map(|e| QuoteErrorItem {
                symbol: e.key,
                error: e.error,
            })
            .collect(),
    })
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/quote/{symbol}", get(get_quote))
        .route("/quote/batch", post(batch_quotes))
}
