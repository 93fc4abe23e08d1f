//! Yahoo Finance primary market-data client.
//!
//! Three call surfaces, matching what resolution needs:
//! - symbol/name search (`v1/finance/search`)
//! - full ticker info (`v10/finance/quoteSummary`, `price` module)
//! - lightweight price snapshot (`v8/finance/chart`)
//!
//! The search and quoteSummary endpoints require crumb/cookie
//! authentication; the crumb is cached process-wide and cleared when Yahoo
//! rejects it.

mod models;

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use lazy_static::lazy_static;
use log::debug;
use reqwest::header;
use urlencoding::encode;

use crate::errors::MarketDataError;
use crate::models::{PriceSnapshot, SearchCandidate, TickerSnapshot};
use crate::provider::PrimaryClient;

use models::{YahooChartResponse, YahooQuoteSummaryResponse, YahooSearchResponse};

const PROVIDER: &str = "YAHOO";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// How many candidates a search requests; resolution never inspects more.
const SEARCH_RESULT_LIMIT: u8 = 8;

// ============================================================================
// Crumb/Cookie Authentication
// ============================================================================

/// Cached Yahoo authentication data
#[derive(Debug, Clone)]
struct CrumbData {
    cookie: String,
    crumb: String,
}

lazy_static! {
    /// Process-wide cache for the Yahoo authentication crumb
    static ref YAHOO_CRUMB: RwLock<Option<CrumbData>> = RwLock::default();
}

fn provider_error(message: String) -> MarketDataError {
    MarketDataError::ProviderError {
        provider: PROVIDER.to_string(),
        message,
    }
}

// ============================================================================
// Yahoo Client
// ============================================================================

/// Primary client backed by the Yahoo Finance HTTP endpoints.
pub struct YahooClient {
    http: reqwest::Client,
}

impl YahooClient {
    /// Create a new Yahoo Finance client.
    pub fn new() -> Result<Self, MarketDataError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| provider_error(format!("Failed to initialize HTTP client: {}", e)))?;
        Ok(Self { http })
    }

    /// Ensure we have a valid Yahoo authentication crumb.
    async fn ensure_crumb(&self) -> Result<CrumbData, MarketDataError> {
        {
            let guard = YAHOO_CRUMB.read().unwrap();
            if let Some(crumb) = guard.as_ref() {
                return Ok(crumb.clone());
            }
        }

        self.fetch_crumb().await
    }

    /// Fetch a new Yahoo authentication crumb.
    async fn fetch_crumb(&self) -> Result<CrumbData, MarketDataError> {
        // Step 1: Get cookie from fc.yahoo.com
        let response = self
            .http
            .get("https://fc.yahoo.com")
            .send()
            .await
            .map_err(|e| provider_error(format!("Failed to get cookie: {}", e)))?;

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split_once(';').map(|(v, _)| v.to_string()))
            .ok_or_else(|| provider_error("Failed to parse Yahoo cookie".to_string()))?;

        // Step 2: Get crumb using cookie
        let crumb = self
            .http
            .get("https://query1.finance.yahoo.com/v1/test/getcrumb")
            .header(header::COOKIE, &cookie)
            .send()
            .await
            .map_err(|e| provider_error(format!("Failed to get crumb: {}", e)))?
            .text()
            .await
            .map_err(|e| provider_error(format!("Failed to read crumb: {}", e)))?;

        let crumb_data = CrumbData { cookie, crumb };

        let mut guard = YAHOO_CRUMB.write().unwrap();
        *guard = Some(crumb_data.clone());

        Ok(crumb_data)
    }

    /// Clear the cached crumb (used when authentication fails)
    fn clear_crumb(&self) {
        let mut guard = YAHOO_CRUMB.write().unwrap();
        *guard = None;
    }
}

#[async_trait]
impl PrimaryClient for YahooClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>, MarketDataError> {
        debug!("Searching Yahoo for '{}'", query);

        let crumb = self.ensure_crumb().await?;
        let url = format!(
            "https://query2.finance.yahoo.com/v1/finance/search?q={}&quotesCount={}&newsCount=0&crumb={}",
            encode(query),
            SEARCH_RESULT_LIMIT,
            encode(&crumb.crumb)
        );

        let response = self
            .http
            .get(&url)
            .header(header::COOKIE, &crumb.cookie)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            self.clear_crumb();
            return Err(provider_error("Yahoo authentication expired".to_string()));
        }

        let data: YahooSearchResponse = response
            .json()
            .await
            .map_err(|e| provider_error(format!("Failed to parse search response: {}", e)))?;

        Ok(data
            .quotes
            .into_iter()
            .map(|quote| SearchCandidate {
                symbol: quote.symbol,
                short_name: quote.shortname,
                long_name: quote.longname,
            })
            .collect())
    }

    async fn info(&self, symbol: &str) -> Result<Option<TickerSnapshot>, MarketDataError> {
        debug!("Fetching ticker info for {} from Yahoo", symbol);

        let crumb = self.ensure_crumb().await?;
        let url = format!(
            "https://query1.finance.yahoo.com/v10/finance/quoteSummary/{}?modules=price&crumb={}",
            encode(symbol),
            encode(&crumb.crumb)
        );

        let response = self
            .http
            .get(&url)
            .header(header::COOKIE, &crumb.cookie)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            self.clear_crumb();
            return Err(provider_error("Yahoo authentication expired".to_string()));
        }
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let data: YahooQuoteSummaryResponse = response
            .json()
            .await
            .map_err(|e| provider_error(format!("Failed to parse quoteSummary response: {}", e)))?;

        let result = match data
            .quote_summary
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
        {
            Some(result) => result,
            None => return Ok(None),
        };
        let price = match result.price {
            Some(price) => price,
            None => return Ok(None),
        };

        Ok(Some(TickerSnapshot {
            price: price.regular_market_price.as_ref().and_then(|p| p.raw),
            currency: price.currency,
            exchange: price.exchange_name,
            quote_type: price.quote_type,
            long_name: price.long_name,
            short_name: price.short_name,
        }))
    }

    async fn fast_price(&self, symbol: &str) -> Result<Option<PriceSnapshot>, MarketDataError> {
        debug!("Fetching fast price for {} from Yahoo", symbol);

        let url = format!(
            "https://query1.finance.yahoo.com/v8/finance/chart/{}?range=1d&interval=1d",
            encode(symbol)
        );

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Ok(None);
        }

        let data: YahooChartResponse = response
            .json()
            .await
            .map_err(|e| provider_error(format!("Failed to parse chart response: {}", e)))?;

        let result = match data.chart.result.unwrap_or_default().into_iter().next() {
            Some(result) => result,
            None => return Ok(None),
        };

        Ok(Some(PriceSnapshot {
            price: result.meta.regular_market_price,
            currency: result.meta.currency,
        }))
    }
}
