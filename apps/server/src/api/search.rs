use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};

use quotedesk_market_data::{run_batch, InstrumentRecord};

use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;
use crate::models::{BatchSearchRequest, BatchSearchResponse, SearchErrorItem};

async fn search_by_isin(
    State(state): State<Arc<AppState>>,
    Path(isin): Path<String>,
) -> ApiResult<Json<InstrumentRecord>> {
    match state.engine.search_by_isin(&isin).await? {
        Some(record) => Ok(Json(record)),
        None => Err(ApiError::NotFound(format!(
            "No instrument found for ISIN: {}",
            isin
        ))),
    }
}

async fn batch_search(
    State(state): State<Arc<AppState>>,
    Json(body): Json<BatchSearchRequest>,
) -> Json<BatchSearchResponse> {
    let engine = state.engine.clone();
    let outcome = run_batch(body.isins, "No instrument found for ISIN", move |isin| {
        let engine = engine.clone();
        async move { engine.search_by_isin(&isin).await }
    })
    .await;

    Json(BatchSearchResponse {
        results: outcome.results,
        errors: outcome
            .errors
            .into_iter()
            .map(|e| SearchErrorItem {
                isin: e.key,
                error: e.error,
            })
            .collect(),
    })
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/search/{isin}", get(search_by_isin))
        .route("/search/batch", post(batch_search))
}
