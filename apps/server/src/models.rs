//! Request/response bodies specific to the HTTP API.

use serde::{Deserialize, Serialize};

use quotedesk_market_data::{InstrumentRecord, QuoteRecord};

#[derive(Deserialize)]
pub struct BatchSearchRequest {
    pub isins: Vec<String>,
}

#[derive(Serialize)]
pub struct SearchErrorItem {
    pub isin: String,
    pub error: String,
}

#[derive(Serialize)]
pub struct BatchSearchResponse {
    pub results: Vec<InstrumentRecord>,
    pub errors: Vec<SearchErrorItem>,
}

#[derive(Deserialize)]
pub struct BatchQuoteRequest {
    pub symbols: Vec<String>,
}

#[derive(Serialize)]
pub struct QuoteErrorItem {
    pub symbol: String,
    pub error: String,
}

#[derive(Serialize)]
pub struct BatchQuoteResponse {
    pub results: Vec<QuoteRecord>,
    pub errors: Vec<QuoteErrorItem>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub api: &'static str,
    pub health: &'static str,
}
