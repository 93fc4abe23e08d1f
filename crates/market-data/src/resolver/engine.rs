//! The multi-stage ISIN resolution pipeline.
//!
//! An ISIN is an unreliable key: the primary source sometimes echoes it
//! back as a placeholder symbol, lists the instrument under a different
//! venue than the first hit suggests, or does not know it at all. The
//! engine works through a fixed sequence of fallback stages, first success
//! wins:
//!
//! 1. format validation (no I/O)
//! 2. primary search for the ISIN
//! 3. probe of the first candidate's symbol
//! 4. suffix sweep over candidate venues
//! 5. name-based search with issuer-term cleaning
//! 6. discovery-provider fallback (probe, cross-pollination, name search,
//!    then degraded acceptance)
//!
//! "Not found" is a value here. The only error that escapes is a failure
//! of the stage-2 search call, which distinguishes "source is down" from
//! "instrument does not exist"; every later failure is logged and folded
//! into the next stage.

use std::sync::Arc;

use log::{debug, warn};
use rust_decimal::Decimal;

use crate::errors::MarketDataError;
use crate::isin::{is_valid_isin, symbol_base};
use crate::models::{
    InstrumentRecord, InstrumentType, QuoteRecord, SearchCandidate, TickerSnapshot,
};
use crate::provider::{DiscoveryProvider, PrimaryClient};

use super::exchange_suffixes::{exchange_for_symbol, CANDIDATE_SUFFIXES};
use super::name_cleaning::clean_fund_name;

/// How many hits a name-based search inspects.
const NAME_SEARCH_CANDIDATES: usize = 3;

/// Orchestrates the primary client and the discovery fallback into the
/// resolution pipeline. Holds no state of its own; the long-lived pieces
/// (cache, breaker) live inside the injected providers.
pub struct ResolutionEngine {
    primary: Arc<dyn PrimaryClient>,
    discovery: Arc<dyn DiscoveryProvider>,
}

impl ResolutionEngine {
    pub fn new(primary: Arc<dyn PrimaryClient>, discovery: Arc<dyn DiscoveryProvider>) -> Self {
        Self { primary, discovery }
    }

    /// Resolve an ISIN to a priced instrument.
    ///
    /// `Ok(None)` covers both malformed input and exhausted fallbacks; an
    /// `Err` means the primary source failed its initial search call.
    pub async fn search_by_isin(
        &self,
        isin: &str,
    ) -> Result<Option<InstrumentRecord>, MarketDataError> {
        if !is_valid_isin(isin) {
            debug!("Rejecting malformed ISIN {:?}", isin);
            return Ok(None);
        }
        let isin = isin.to_uppercase();

        let candidates = self.primary.search(&isin).await?;

        let candidate = match candidates.into_iter().next() {
            Some(candidate) => candidate,
            None => {
                debug!("Primary search returned no candidates for {}", isin);
                return Ok(self.discovery_fallback(&isin).await);
            }
        };
        let symbol = match candidate.symbol.clone().filter(|s| !s.is_empty()) {
            Some(symbol) => symbol,
            None => {
                debug!("First candidate for {} carries no symbol", isin);
                return Ok(self.discovery_fallback(&isin).await);
            }
        };

        if let Some(record) = self.probe(&isin, &symbol, Some(&candidate)).await {
            return Ok(Some(record));
        }

        if let Some(record) = self.suffix_sweep(&isin, &symbol, Some(&candidate)).await {
            return Ok(Some(record));
        }

        if let Some(name) = candidate.display_name() {
            if let Some(record) = self.search_by_name(&isin, name).await {
                return Ok(Some(record));
            }
        }

        Ok(self.discovery_fallback(&isin).await)
    }

    /// Fetch a quote for a symbol, with one self-repair pass.
    ///
    /// If the symbol cannot be priced and its base part is ISIN-shaped, the
    /// "symbol" is most likely an unresolved ISIN that leaked into a
    /// portfolio; resolving it once and retrying often recovers the quote.
    /// The retry is bounded to a single pass so a repaired symbol that is
    /// itself a disguised ISIN cannot recurse.
    pub async fn get_quote(&self, symbol: &str) -> Result<Option<QuoteRecord>, MarketDataError> {
        let mut current = symbol.to_string();

        for repair_attempted in [false, true] {
            if let Some(quote) = self.fetch_quote(&current).await? {
                return Ok(Some(quote));
            }
            if repair_attempted {
                break;
            }

            let base = symbol_base(&current).to_string();
            if !is_valid_isin(&base) {
                break;
            }
            debug!(
                "Quote for {} failed and its base looks like an ISIN, attempting repair",
                current
            );
            let repaired = match self.search_by_isin(&base).await {
                Ok(record) => record,
                Err(e) => {
                    // Repair is an optimization; a resolution failure here
                    // must not fail the quote harder than no repair at all.
                    warn!("Repair resolution failed for {}: {}", base, e);
                    None
                }
            };
            match repaired {
                Some(record) if record.symbol != current => {
                    debug!("Repaired {} to {}", current, record.symbol);
                    current = record.symbol;
                }
                _ => break,
            }
        }

        warn!("No price data found for symbol {}", symbol);
        Ok(None)
    }

    /// One quote attempt: fast snapshot first, full info as fallback.
    ///
    /// Fast-path errors are swallowed (the info call covers for them); an
    /// info transport error propagates.
    async fn fetch_quote(&self, symbol: &str) -> Result<Option<QuoteRecord>, MarketDataError> {
        let mut price = None;
        let mut currency = None;

        match self.primary.fast_price(symbol).await {
            Ok(Some(snapshot)) => {
                price = snapshot.price;
                currency = snapshot.currency;
            }
            Ok(None) => {}
            Err(e) => debug!("Fast price lookup failed for {}: {}", symbol, e),
        }

        if !price_is_valid(price) {
            if let Some(snapshot) = self.primary.info(symbol).await? {
                price = snapshot.price.or(price);
                currency = currency.or(snapshot.currency);
            }
        }

        let price = match price.filter(|p| p.is_finite() && *p > 0.0) {
            Some(price) => price,
            None => return Ok(None),
        };
        let decimal = match Decimal::from_f64_retain(price) {
            Some(decimal) => decimal,
            None => {
                warn!("Price {} for {} is not representable", price, symbol);
                return Ok(None);
            }
        };

        Ok(Some(QuoteRecord::now(
            symbol,
            decimal,
            currency.unwrap_or_else(|| "USD".to_string()),
        )))
    }

    /// Probe a symbol against the primary source.
    ///
    /// Valid iff the reported price is present, finite and positive, and
    /// the result is not a ghost record. Probe failures are never errors;
    /// they just move resolution along.
    async fn probe(
        &self,
        isin: &str,
        symbol: &str,
        candidate: Option<&SearchCandidate>,
    ) -> Option<InstrumentRecord> {
        let snapshot = match self.primary.info(symbol).await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                debug!("No info for {}", symbol);
                return None;
            }
            Err(e) => {
                debug!("Info lookup failed for {}: {}", symbol, e);
                return None;
            }
        };

        if !price_is_valid(snapshot.price) {
            debug!(
                "Probe for {} rejected: price {:?} not positive",
                symbol, snapshot.price
            );
            return None;
        }

        // Ghost record: the source echoed the ISIN back as a symbol with no
        // real instrument behind it.
        if symbol_base(symbol) == isin && snapshot.long_name.is_none() {
            debug!("Probe for {} rejected: ghost record", symbol);
            return None;
        }

        debug!("Probe for {} succeeded", symbol);
        Some(build_record(isin, symbol, &snapshot, candidate))
    }

    /// Try the base symbol against every candidate market suffix.
    ///
    /// Skipped entirely when the base equals the ISIN: suffixing an
    /// ISIN-as-ticker is known futile.
    async fn suffix_sweep(
        &self,
        isin: &str,
        tried: &str,
        candidate: Option<&SearchCandidate>,
    ) -> Option<InstrumentRecord> {
        let base = symbol_base(tried);
        if base == isin {
            debug!(
                "Skipping suffix sweep for {}: search echoed the ISIN back",
                isin
            );
            return None;
        }

        for suffix in CANDIDATE_SUFFIXES {
            let attempt = format!("{}{}", base, suffix);
            if attempt == tried {
                continue;
            }
            if let Some(record) = self.probe(isin, &attempt, candidate).await {
                debug!("Suffix sweep resolved {} as {}", isin, attempt);
                return Some(record);
            }
        }

        None
    }

    /// Re-search by display name and probe the first few hits.
    async fn search_by_name(&self, isin: &str, name: &str) -> Option<InstrumentRecord> {
        let query = clean_fund_name(name);
        debug!("Name search for {} using {:?}", isin, query);

        let candidates = match self.primary.search(&query).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("Name search failed for {}: {}", isin, e);
                return None;
            }
        };

        for candidate in candidates.iter().take(NAME_SEARCH_CANDIDATES) {
            let symbol = match candidate.symbol.as_deref().filter(|s| !s.is_empty()) {
                Some(symbol) => symbol,
                None => continue,
            };
            // A hit whose symbol carries the ISIN is the same ghost the
            // direct search produced, under another name.
            if symbol.contains(isin) {
                debug!("Name search skipping {}: echoes the ISIN", symbol);
                continue;
            }
            if let Some(record) = self.probe(isin, symbol, Some(candidate)).await {
                return Some(record);
            }
        }

        None
    }

    /// Last stage: ask the discovery provider, then work its suggestion
    /// back into the primary source.
    async fn discovery_fallback(&self, isin: &str) -> Option<InstrumentRecord> {
        let suggestion = self.discovery.search_by_isin(isin).await?;
        debug!("Discovery suggested {} for {}", suggestion.symbol, isin);

        if let Some(record) = self.probe(isin, &suggestion.symbol, None).await {
            return Some(record);
        }

        // Cross-pollination: the discovery source's venue guess may differ
        // from where the primary source actually lists the instrument, so
        // retry its bare ticker against every suffix.
        let ticker = symbol_base(&suggestion.symbol);
        for suffix in CANDIDATE_SUFFIXES {
            let attempt = format!("{}{}", ticker, suffix);
            if attempt == suggestion.symbol {
                continue;
            }
            if let Some(record) = self.probe(isin, &attempt, None).await {
                debug!("Cross-pollination resolved {} as {}", isin, attempt);
                return Some(record);
            }
        }

        if let Some(record) = self.search_by_name(isin, &suggestion.name).await {
            return Some(record);
        }

        // Better a degraded answer than none: the suggestion is served
        // as-is even though the primary source cannot price it.
        warn!(
            "Serving unverified discovery metadata for {}: {}",
            isin, suggestion.symbol
        );
        Some(InstrumentRecord {
            isin: isin.to_string(),
            symbol: suggestion.symbol,
            name: suggestion.name,
            instrument_type: InstrumentType::Etf,
            currency: suggestion.currency,
            exchange: suggestion.exchange,
        })
    }
}

fn price_is_valid(price: Option<f64>) -> bool {
    price.map(|p| p.is_finite() && p > 0.0).unwrap_or(false)
}

/// Assemble the API-facing record from a validated probe.
fn build_record(
    isin: &str,
    symbol: &str,
    snapshot: &TickerSnapshot,
    candidate: Option<&SearchCandidate>,
) -> InstrumentRecord {
    let instrument_type = match snapshot.quote_type.as_deref() {
        Some("ETF") => InstrumentType::Etf,
        _ => InstrumentType::Stock,
    };

    let name = snapshot
        .long_name
        .clone()
        .or_else(|| snapshot.short_name.clone())
        .or_else(|| candidate.and_then(|c| c.short_name.clone()))
        .unwrap_or_else(|| symbol.to_string());

    let exchange = snapshot
        .exchange
        .clone()
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| exchange_for_symbol(symbol));

    InstrumentRecord {
        isin: isin.to_string(),
        symbol: symbol.to_string(),
        name,
        instrument_type,
        currency: snapshot
            .currency
            .clone()
            .unwrap_or_else(|| "USD".to_string()),
        exchange,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::models::{PriceSnapshot, TickerInfo};

    /// Scriptable primary source that records every call.
    #[derive(Default)]
    struct MockPrimary {
        search_responses: HashMap<String, Vec<SearchCandidate>>,
        search_fails: bool,
        info_responses: HashMap<String, TickerSnapshot>,
        fast_prices: HashMap<String, PriceSnapshot>,
        search_calls: Mutex<Vec<String>>,
        info_calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PrimaryClient for MockPrimary {
        async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>, MarketDataError> {
            self.search_calls.lock().unwrap().push(query.to_string());
            if self.search_fails {
                return Err(MarketDataError::ProviderError {
                    provider: "MOCK".to_string(),
                    message: "source is down".to_string(),
                });
            }
            Ok(self.search_responses.get(query).cloned().unwrap_or_default())
        }

        async fn info(&self, symbol: &str) -> Result<Option<TickerSnapshot>, MarketDataError> {
            self.info_calls.lock().unwrap().push(symbol.to_string());
            Ok(self.info_responses.get(symbol).cloned())
        }

        async fn fast_price(&self, symbol: &str) -> Result<Option<PriceSnapshot>, MarketDataError> {
            Ok(self.fast_prices.get(symbol).cloned())
        }
    }

    #[derive(Default)]
    struct MockDiscovery {
        response: Option<TickerInfo>,
        calls: Mutex<u32>,
    }

    #[async_trait]
    impl DiscoveryProvider for MockDiscovery {
        async fn search_by_isin(&self, _isin: &str) -> Option<TickerInfo> {
            *self.calls.lock().unwrap() += 1;
            self.response.clone()
        }
    }

    fn engine_with(
        primary: MockPrimary,
        discovery: MockDiscovery,
    ) -> (ResolutionEngine, Arc<MockPrimary>, Arc<MockDiscovery>) {
        let primary = Arc::new(primary);
        let discovery = Arc::new(discovery);
        let engine = ResolutionEngine::new(primary.clone(), discovery.clone());
        (engine, primary, discovery)
    }

    fn candidate(symbol: &str) -> SearchCandidate {
        SearchCandidate {
            symbol: Some(symbol.to_string()),
            short_name: None,
            long_name: None,
        }
    }

    fn priced_snapshot(price: f64, long_name: Option<&str>) -> TickerSnapshot {
        TickerSnapshot {
            price: Some(price),
            currency: Some("USD".to_string()),
            exchange: None,
            quote_type: Some("EQUITY".to_string()),
            long_name: long_name.map(str::to_string),
            short_name: None,
        }
    }

    #[tokio::test]
    async fn test_malformed_isin_fails_fast_without_io() {
        let (engine, primary, discovery) = engine_with(MockPrimary::default(), MockDiscovery::default());

        let result = engine.search_by_isin("INVALID").await.unwrap();

        assert!(result.is_none());
        assert!(primary.search_calls.lock().unwrap().is_empty());
        assert_eq!(*discovery.calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_direct_probe_resolves_apple() {
        let mut primary = MockPrimary::default();
        primary
            .search_responses
            .insert("US0378331005".to_string(), vec![candidate("AAPL")]);
        primary.info_responses.insert(
            "AAPL".to_string(),
            TickerSnapshot {
                price: Some(195.5),
                currency: Some("USD".to_string()),
                exchange: Some("NASDAQ".to_string()),
                quote_type: Some("EQUITY".to_string()),
                long_name: Some("Apple Inc.".to_string()),
                short_name: None,
            },
        );
        let (engine, _, _) = engine_with(primary, MockDiscovery::default());

        let record = engine.search_by_isin("US0378331005").await.unwrap().unwrap();

        assert_eq!(record.isin, "US0378331005");
        assert_eq!(record.symbol, "AAPL");
        assert_eq!(record.name, "Apple Inc.");
        assert_eq!(record.instrument_type, InstrumentType::Stock);
        assert_eq!(record.currency, "USD");
        assert_eq!(record.exchange, "NASDAQ");
    }

    #[tokio::test]
    async fn test_ghost_record_is_rejected_despite_price() {
        let mut primary = MockPrimary::default();
        primary
            .search_responses
            .insert("US0378331005".to_string(), vec![candidate("US0378331005")]);
        // Positive price, but the symbol echoes the ISIN and has no name.
        primary.info_responses.insert(
            "US0378331005".to_string(),
            priced_snapshot(100.0, None),
        );
        let (engine, _, _) = engine_with(primary, MockDiscovery::default());

        let result = engine.search_by_isin("US0378331005").await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_suffix_sweep_skipped_when_search_echoes_isin() {
        let mut primary = MockPrimary::default();
        primary
            .search_responses
            .insert("IE00BK5BQT80".to_string(), vec![candidate("IE00BK5BQT80")]);
        let (engine, primary, _) = engine_with(primary, MockDiscovery::default());

        let result = engine.search_by_isin("IE00BK5BQT80").await.unwrap();

        assert!(result.is_none());
        // Only the direct probe ran; no suffix candidates were tried.
        assert_eq!(*primary.info_calls.lock().unwrap(), vec!["IE00BK5BQT80"]);
    }

    #[tokio::test]
    async fn test_suffix_sweep_finds_other_listing() {
        let mut primary = MockPrimary::default();
        primary
            .search_responses
            .insert("IE00BK5BQT80".to_string(), vec![candidate("VWRA")]);
        primary.info_responses.insert(
            "VWRA.L".to_string(),
            TickerSnapshot {
                quote_type: Some("ETF".to_string()),
                ..priced_snapshot(107.2, Some("Vanguard FTSE All-World"))
            },
        );
        let (engine, primary, _) = engine_with(primary, MockDiscovery::default());

        let record = engine.search_by_isin("IE00BK5BQT80").await.unwrap().unwrap();

        assert_eq!(record.symbol, "VWRA.L");
        assert_eq!(record.instrument_type, InstrumentType::Etf);
        assert_eq!(record.exchange, "London Stock Exchange");
        // The sweep went in order and stopped at the first valid probe.
        let calls = primary.info_calls.lock().unwrap().clone();
        assert_eq!(calls, vec!["VWRA", "VWRA.DE", "VWRA.L"]);
    }

    #[tokio::test]
    async fn test_name_search_skips_isin_echo_and_resolves() {
        let mut primary = MockPrimary::default();
        primary.search_responses.insert(
            "IE00BK5BQT80".to_string(),
            vec![SearchCandidate {
                symbol: Some("IE00BK5BQT80".to_string()),
                short_name: None,
                long_name: Some("Vanguard FTSE All-World UCITS ETF (Acc)".to_string()),
            }],
        );
        primary.search_responses.insert(
            "FTSE All-World".to_string(),
            vec![candidate("IE00BK5BQT80.SG"), candidate("VWRL.L")],
        );
        primary.info_responses.insert(
            "VWRL.L".to_string(),
            TickerSnapshot {
                quote_type: Some("ETF".to_string()),
                ..priced_snapshot(104.1, Some("Vanguard FTSE All-World"))
            },
        );
        let (engine, primary, _) = engine_with(primary, MockDiscovery::default());

        let record = engine.search_by_isin("IE00BK5BQT80").await.unwrap().unwrap();

        assert_eq!(record.symbol, "VWRL.L");
        let searches = primary.search_calls.lock().unwrap().clone();
        assert_eq!(searches, vec!["IE00BK5BQT80", "FTSE All-World"]);
        // The echo candidate was never probed.
        assert!(!primary
            .info_calls
            .lock()
            .unwrap()
            .contains(&"IE00BK5BQT80.SG".to_string()));
    }

    #[tokio::test]
    async fn test_initial_search_failure_propagates() {
        let primary = MockPrimary {
            search_fails: true,
            ..Default::default()
        };
        let (engine, _, discovery) = engine_with(primary, MockDiscovery::default());

        let result = engine.search_by_isin("US0378331005").await;

        assert!(result.is_err());
        // A hard primary failure never falls through to the fallback.
        assert_eq!(*discovery.calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_discovery_probe_success() {
        let mut primary = MockPrimary::default();
        primary.info_responses.insert(
            "VWCE.DE".to_string(),
            TickerSnapshot {
                quote_type: Some("ETF".to_string()),
                currency: Some("EUR".to_string()),
                ..priced_snapshot(109.9, Some("Vanguard FTSE All-World"))
            },
        );
        let discovery = MockDiscovery {
            response: Some(TickerInfo {
                symbol: "VWCE.DE".to_string(),
                name: "Vanguard FTSE All-World".to_string(),
                exchange: "XETRA".to_string(),
                currency: "EUR".to_string(),
            }),
            ..Default::default()
        };
        let (engine, _, _) = engine_with(primary, discovery);

        let record = engine.search_by_isin("IE00BK5BQT80").await.unwrap().unwrap();

        assert_eq!(record.symbol, "VWCE.DE");
        assert_eq!(record.instrument_type, InstrumentType::Etf);
        assert_eq!(record.currency, "EUR");
    }

    #[tokio::test]
    async fn test_discovery_cross_pollination() {
        let mut primary = MockPrimary::default();
        // The discovery source suggests the German listing, but the primary
        // source only knows the London one.
        primary.info_responses.insert(
            "VWCE.L".to_string(),
            TickerSnapshot {
                quote_type: Some("ETF".to_string()),
                ..priced_snapshot(88.4, Some("Vanguard FTSE All-World"))
            },
        );
        let discovery = MockDiscovery {
            response: Some(TickerInfo {
                symbol: "VWCE.DE".to_string(),
                name: "Vanguard FTSE All-World".to_string(),
                exchange: "XETRA".to_string(),
                currency: "EUR".to_string(),
            }),
            ..Default::default()
        };
        let (engine, _, _) = engine_with(primary, discovery);

        let record = engine.search_by_isin("IE00BK5BQT80").await.unwrap().unwrap();

        assert_eq!(record.symbol, "VWCE.L");
    }

    #[tokio::test]
    async fn test_discovery_degraded_acceptance() {
        // The primary source knows nothing at all; the raw suggestion is
        // still served, typed as an ETF.
        let discovery = MockDiscovery {
            response: Some(TickerInfo {
                symbol: "ZPRV.DE".to_string(),
                name: "SPDR MSCI USA Small Cap".to_string(),
                exchange: "XETRA".to_string(),
                currency: "EUR".to_string(),
            }),
            ..Default::default()
        };
        let (engine, _, _) = engine_with(MockPrimary::default(), discovery);

        let record = engine.search_by_isin("IE00BSPLC413").await.unwrap().unwrap();

        assert_eq!(record.symbol, "ZPRV.DE");
        assert_eq!(record.instrument_type, InstrumentType::Etf);
        assert_eq!(record.exchange, "XETRA");
        assert_eq!(record.currency, "EUR");
    }

    #[tokio::test]
    async fn test_exhausted_pipeline_returns_none() {
        let (engine, _, discovery) = engine_with(MockPrimary::default(), MockDiscovery::default());

        let result = engine.search_by_isin("US0378331005").await.unwrap();

        assert!(result.is_none());
        assert_eq!(*discovery.calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_quote_from_fast_path() {
        let mut primary = MockPrimary::default();
        primary.fast_prices.insert(
            "AAPL".to_string(),
            PriceSnapshot {
                price: Some(195.5),
                currency: Some("USD".to_string()),
            },
        );
        let (engine, primary, _) = engine_with(primary, MockDiscovery::default());

        let quote = engine.get_quote("AAPL").await.unwrap().unwrap();

        assert_eq!(quote.symbol, "AAPL");
        assert_eq!(quote.price, "195.5000");
        assert_eq!(quote.currency, "USD");
        // The fast path sufficed; no info call was made.
        assert!(primary.info_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_quote_falls_back_to_info() {
        let mut primary = MockPrimary::default();
        primary.info_responses.insert(
            "RR.L".to_string(),
            TickerSnapshot {
                price: Some(4.2105),
                currency: Some("GBP".to_string()),
                ..Default::default()
            },
        );
        let (engine, _, _) = engine_with(primary, MockDiscovery::default());

        let quote = engine.get_quote("RR.L").await.unwrap().unwrap();

        assert_eq!(quote.price, "4.2105");
        assert_eq!(quote.currency, "GBP");
    }

    #[tokio::test]
    async fn test_quote_rejects_nonpositive_price() {
        let mut primary = MockPrimary::default();
        primary.fast_prices.insert(
            "DEAD".to_string(),
            PriceSnapshot {
                price: Some(0.0),
                currency: Some("USD".to_string()),
            },
        );
        let (engine, _, _) = engine_with(primary, MockDiscovery::default());

        assert!(engine.get_quote("DEAD").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_quote_self_repair_resolves_disguised_isin() {
        let mut primary = MockPrimary::default();
        primary
            .search_responses
            .insert("IE00BK5BQT80".to_string(), vec![candidate("VWRA.L")]);
        primary.info_responses.insert(
            "VWRA.L".to_string(),
            TickerSnapshot {
                quote_type: Some("ETF".to_string()),
                ..priced_snapshot(107.2, Some("Vanguard FTSE All-World"))
            },
        );
        let (engine, _, _) = engine_with(primary, MockDiscovery::default());

        // The "symbol" is really an unresolved ISIN.
        let quote = engine.get_quote("IE00BK5BQT80").await.unwrap().unwrap();

        assert_eq!(quote.symbol, "VWRA.L");
        assert_eq!(quote.price, "107.2000");
    }

    #[tokio::test]
    async fn test_quote_self_repair_is_bounded() {
        // Repair resolves via the degraded discovery path to ANOTHER
        // unpriceable ISIN-shaped symbol. An unbounded repair would chase
        // it with a second resolution; the bound allows exactly one.
        let discovery = MockDiscovery {
            response: Some(TickerInfo {
                symbol: "DE000A0H0744".to_string(),
                name: "Some Fund".to_string(),
                exchange: "Unknown".to_string(),
                currency: "EUR".to_string(),
            }),
            ..Default::default()
        };
        let (engine, primary, discovery) = engine_with(MockPrimary::default(), discovery);

        let quote = engine.get_quote("IE00BSPLC413").await.unwrap();

        assert!(quote.is_none());
        // One repair pass: one discovery consult, and only the searches
        // belonging to that single resolution (ISIN + fallback name).
        assert_eq!(*discovery.calls.lock().unwrap(), 1);
        assert_eq!(primary.search_calls.lock().unwrap().len(), 2);
    }
}
