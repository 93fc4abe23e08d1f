//! Yahoo Finance API response models.
//!
//! Only the fields resolution actually reads are modeled; the endpoints
//! return far more.

use serde::Deserialize;

/// Search endpoint response wrapper
#[derive(Debug, Deserialize)]
pub struct YahooSearchResponse {
    #[serde(default)]
    pub quotes: Vec<YahooSearchQuote>,
}

/// One hit from the search endpoint. The wire format uses flat lowercase
/// keys here, unlike the camelCase quoteSummary API.
#[derive(Debug, Deserialize)]
pub struct YahooSearchQuote {
    pub symbol: Option<String>,
    pub shortname: Option<String>,
    pub longname: Option<String>,
}

/// Main response wrapper for quoteSummary API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteSummaryResponse {
    pub quote_summary: YahooQuoteSummary,
}

/// Quote summary container. `result` is null when the symbol is unknown.
#[derive(Debug, Deserialize)]
pub struct YahooQuoteSummary {
    pub result: Option<Vec<YahooQuoteSummaryResult>>,
}

/// Individual result from quoteSummary API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteSummaryResult {
    pub price: Option<YahooPriceData>,
}

/// Price module data from quoteSummary
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooPriceData {
    pub currency: Option<String>,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub quote_type: Option<String>,
    pub exchange_name: Option<String>,
    pub regular_market_price: Option<YahooPriceDetail>,
}

/// Price detail with raw and formatted values; only raw is used
#[derive(Clone, Debug, Deserialize)]
pub struct YahooPriceDetail {
    pub raw: Option<f64>,
}

/// Chart endpoint wrapper (the fast price path)
#[derive(Debug, Deserialize)]
pub struct YahooChartResponse {
    pub chart: YahooChart,
}

#[derive(Debug, Deserialize)]
pub struct YahooChart {
    pub result: Option<Vec<YahooChartResult>>,
}

#[derive(Debug, Deserialize)]
pub struct YahooChartResult {
    pub meta: YahooChartMeta,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooChartMeta {
    pub regular_market_price: Option<f64>,
    pub currency: Option<String>,
}
