//! Secondary discovery provider scraping justETF profile pages.
//!
//! Used when the primary source cannot resolve an ISIN at all. The site
//! blocks aggressive clients with HTTP 403, so every instance carries a
//! [`CircuitBreaker`] that pauses scraping for a cooldown period after a
//! block. The breaker is per provider instance, not per ISIN: one block
//! silences all lookups until it expires.
//!
//! Extraction works on unstructured markup, so it is an ordered list of
//! pattern-to-extractor attempts, first match wins.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lazy_static::lazy_static;
use log::{debug, error, info, warn};
use regex::Regex;
use reqwest::header::{self, HeaderMap, HeaderValue};
use scraper::{Html, Selector};

use crate::cache::MetadataCache;
use crate::errors::MarketDataError;
use crate::models::TickerInfo;
use crate::provider::circuit_breaker::CircuitBreaker;
use crate::provider::DiscoveryProvider;

pub const DEFAULT_BASE_URL: &str = "https://www.justetf.com/en/etf-profile.html";

const PROVIDER: &str = "JUSTETF";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const BLOCK_COOLDOWN: Duration = Duration::from_secs(10 * 60);
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// justETF exchange labels mapped to the primary source's market suffixes.
const EXCHANGE_TO_SUFFIX: [(&str, &str); 7] = [
    ("XETRA", ".DE"),
    ("gettex", ".DE"),
    ("London Stock Exchange", ".L"),
    ("Euronext Paris", ".PA"),
    ("Euronext Amsterdam", ".AS"),
    ("Borsa Italiana", ".MI"),
    ("SIX Swiss Exchange", ".SW"),
];

/// Suffix used when no known exchange shows up on the page. Most
/// instruments this provider covers are European-listed, and London is the
/// most common venue among them.
const DEFAULT_SUFFIX: &str = ".L";

lazy_static! {
    /// Ticker extraction patterns, tried in priority order.
    static ref TICKER_PATTERNS: [Regex; 3] = [
        Regex::new(r#"(?i)"ticker"\s*:\s*"([A-Z0-9]+)""#).unwrap(),
        Regex::new(r"(?i)Ticker[:\s]+([A-Z0-9]{2,10})\b").unwrap(),
        Regex::new(r#"(?i)data-ticker="([A-Z0-9]+)""#).unwrap(),
    ];
    static ref CURRENCY_PATTERN: Regex = Regex::new(r"\b(EUR|USD|GBP|CHF)\b").unwrap();
    static ref H1_SELECTOR: Selector = Selector::parse("h1").unwrap();
    static ref TITLE_SELECTOR: Selector = Selector::parse("title").unwrap();
}

/// Scraping-based fallback provider with circuit-breaker protection.
pub struct JustEtfProvider {
    http: reqwest::Client,
    base_url: String,
    cache: Arc<MetadataCache>,
    breaker: CircuitBreaker,
}

impl JustEtfProvider {
    pub fn new(cache: Arc<MetadataCache>) -> Result<Self, MarketDataError> {
        Self::with_base_url(cache, DEFAULT_BASE_URL)
    }

    /// The lookup URL is injectable so tests can point at a local server.
    pub fn with_base_url(
        cache: Arc<MetadataCache>,
        base_url: impl Into<String>,
    ) -> Result<Self, MarketDataError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.5"),
        );
        headers.insert(header::DNT, HeaderValue::from_static("1"));
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(
            header::UPGRADE_INSECURE_REQUESTS,
            HeaderValue::from_static("1"),
        );

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER.to_string(),
                message: format!("Failed to initialize HTTP client: {}", e),
            })?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            cache,
            breaker: CircuitBreaker::new(),
        })
    }

    /// Breaker state, exposed for diagnostics and tests.
    pub fn is_blocked(&self) -> bool {
        self.breaker.is_open()
    }

    /// Fetch the profile page for `isin`. A 403 trips the breaker; all
    /// other failures just yield `None`.
    async fn fetch_profile(&self, isin: &str) -> Option<String> {
        let response = match self
            .http
            .get(&self.base_url)
            .query(&[("isin", isin)])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("justETF: Request failed for ISIN {}: {}", isin, e);
                return None;
            }
        };

        if response.status() == reqwest::StatusCode::FORBIDDEN {
            error!(
                "justETF returned 403, tripping circuit breaker for {:?}",
                BLOCK_COOLDOWN
            );
            self.breaker.trip(BLOCK_COOLDOWN);
            return None;
        }
        if !response.status().is_success() {
            warn!(
                "justETF: Unexpected status {} for ISIN {}",
                response.status(),
                isin
            );
            return None;
        }

        match response.text().await {
            Ok(body) => Some(body),
            Err(e) => {
                warn!("justETF: Failed to read body for ISIN {}: {}", isin, e);
                None
            }
        }
    }
}

#[async_trait]
impl DiscoveryProvider for JustEtfProvider {
    async fn search_by_isin(&self, isin: &str) -> Option<TickerInfo> {
        if let Some(cached) = self.cache.get(isin).await {
            return Some(cached);
        }

        if self.breaker.is_open() {
            warn!(
                "justETF provider is temporarily blocked, skipping search for {}",
                isin
            );
            return None;
        }

        let body = self.fetch_profile(isin).await?;
        let info = match parse_profile(&body) {
            Some(info) => info,
            None => {
                warn!("justETF: No ticker found for ISIN {}", isin);
                return None;
            }
        };

        info!("justETF: Found {} for ISIN {}", info.symbol, isin);
        self.cache.set(isin, &info).await;
        Some(info)
    }
}

// ============================================================================
// Page Extraction
// ============================================================================

/// Parse a profile page into ticker metadata. `None` when no ticker pattern
/// matches; a page without a ticker carries nothing usable.
fn parse_profile(html: &str) -> Option<TickerInfo> {
    let ticker = extract_ticker(html)?;

    let document = Html::parse_document(html);
    let text = page_text(&document);
    let name = extract_name(&document);
    let (exchange, suffix) = extract_exchange(&text);
    let currency = extract_currency(&text);
    debug!(
        "justETF extraction: ticker={} exchange={:?} suffix={}",
        ticker, exchange, suffix
    );

    Some(TickerInfo {
        symbol: format!("{}{}", ticker, suffix),
        name: name.unwrap_or_else(|| ticker.clone()),
        exchange: exchange
            .map(str::to_string)
            .unwrap_or_else(|| "Unknown".to_string()),
        currency: currency.unwrap_or_else(|| "EUR".to_string()),
    })
}

/// Ticker symbol via ordered regex attempts against the raw markup.
fn extract_ticker(html: &str) -> Option<String> {
    TICKER_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(html).map(|c| c[1].to_uppercase()))
}

/// Instrument name: `h1` heading first, page title (minus the site suffix)
/// as fallback.
fn extract_name(document: &Html) -> Option<String> {
    if let Some(h1) = document.select(&H1_SELECTOR).next() {
        let text = collapse_whitespace(&h1.text().collect::<String>());
        if !text.is_empty() {
            return Some(text);
        }
    }

    if let Some(title) = document.select(&TITLE_SELECTOR).next() {
        let text = title.text().collect::<String>();
        let head = text.split('|').next().unwrap_or("").trim();
        if !head.is_empty() {
            return Some(head.to_string());
        }
    }

    None
}

/// Exchange name and market suffix via substring search of the page text.
fn extract_exchange(text: &str) -> (Option<&'static str>, &'static str) {
    for (exchange, suffix) in EXCHANGE_TO_SUFFIX {
        if text.contains(exchange) {
            return (Some(exchange), suffix);
        }
    }
    (None, DEFAULT_SUFFIX)
}

/// Trading currency via regex over the page text.
fn extract_currency(text: &str) -> Option<String> {
    CURRENCY_PATTERN.captures(text).map(|c| c[1].to_string())
}

fn page_text(document: &Html) -> String {
    document.root_element().text().collect::<Vec<_>>().join(" ")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_ticker_json_field() {
        let html = r#"<script>{"ticker":"VWCE","isin":"IE00BK5BQT80"}</script>"#;
        assert_eq!(extract_ticker(html), Some("VWCE".to_string()));
    }

    #[test]
    fn test_extract_ticker_label_text() {
        let html = "<span>Ticker: NATO</span>";
        assert_eq!(extract_ticker(html), Some("NATO".to_string()));
    }

    #[test]
    fn test_extract_ticker_data_attribute() {
        let html = r#"<div data-ticker="VWRA"></div>"#;
        assert_eq!(extract_ticker(html), Some("VWRA".to_string()));
    }

    #[test]
    fn test_extract_ticker_none() {
        assert_eq!(extract_ticker("<html><body>nothing here</body></html>"), None);
    }

    #[test]
    fn test_extract_name_prefers_h1() {
        let document = Html::parse_document(
            "<html><head><title>Other | justETF</title></head><body><h1>Vanguard FTSE All-World</h1></body></html>",
        );
        assert_eq!(
            extract_name(&document),
            Some("Vanguard FTSE All-World".to_string())
        );
    }

    #[test]
    fn test_extract_name_title_fallback_strips_site() {
        let document = Html::parse_document(
            "<html><head><title>iShares Core MSCI World | justETF</title></head><body></body></html>",
        );
        assert_eq!(
            extract_name(&document),
            Some("iShares Core MSCI World".to_string())
        );
    }

    #[test]
    fn test_extract_exchange_match_and_default() {
        let (name, suffix) = extract_exchange("Trading on XETRA exchange");
        assert_eq!(name, Some("XETRA"));
        assert_eq!(suffix, ".DE");

        let (name, suffix) = extract_exchange("No specific exchange mentioned");
        assert_eq!(name, None);
        assert_eq!(suffix, ".L");
    }

    #[test]
    fn test_extract_currency() {
        assert_eq!(
            extract_currency("The currency is USD"),
            Some("USD".to_string())
        );
        assert_eq!(extract_currency("Trading in EUR"), Some("EUR".to_string()));
        assert_eq!(extract_currency("nothing priced here"), None);
    }

    #[test]
    fn test_parse_profile_composes_symbol() {
        let html = r#"<html><head><title>Vanguard FTSE All-World | justETF</title></head>
            <body><h1>Vanguard FTSE All-World</h1>
            <div data-ticker="VWCE"></div>
            <p>Listed on XETRA, trading currency EUR</p></body></html>"#;

        let info = parse_profile(html).unwrap();
        assert_eq!(info.symbol, "VWCE.DE");
        assert_eq!(info.name, "Vanguard FTSE All-World");
        assert_eq!(info.exchange, "XETRA");
        assert_eq!(info.currency, "EUR");
    }

    #[test]
    fn test_parse_profile_defaults() {
        let html = r#"<html><body><div data-ticker="VWRA"></div></body></html>"#;

        let info = parse_profile(html).unwrap();
        assert_eq!(info.symbol, "VWRA.L");
        assert_eq!(info.name, "VWRA");
        assert_eq!(info.exchange, "Unknown");
        assert_eq!(info.currency, "EUR");
    }

    #[test]
    fn test_parse_profile_without_ticker() {
        assert!(parse_profile("<html><body><h1>Some Fund</h1></body></html>").is_none());
    }
}
