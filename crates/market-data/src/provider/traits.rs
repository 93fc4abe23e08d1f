//! Trait definitions for the data sources the resolution engine consumes.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{PriceSnapshot, SearchCandidate, TickerInfo, TickerSnapshot};

/// The primary market-data source.
///
/// The engine treats this source as authoritative: only instruments it can
/// price are served on the normal path. Implementations may raise on
/// transport failure; the engine decides per stage whether that failure is
/// fatal or just moves resolution to the next fallback.
#[async_trait]
pub trait PrimaryClient: Send + Sync {
    /// Generic symbol/name search.
    async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>, MarketDataError>;

    /// Full ticker info for a symbol. `Ok(None)` when the source has no
    /// record of the symbol.
    async fn info(&self, symbol: &str) -> Result<Option<TickerSnapshot>, MarketDataError>;

    /// Lightweight price snapshot; cheaper than [`info`](Self::info) but
    /// carries less data and may be unavailable.
    async fn fast_price(&self, symbol: &str) -> Result<Option<PriceSnapshot>, MarketDataError>;
}

/// A fallback source able to map an ISIN to ticker metadata.
///
/// Fallback sources swallow their own failures: whatever goes wrong
/// (blocked, down, unparseable), the answer is `None` and resolution
/// continues without them.
#[async_trait]
pub trait DiscoveryProvider: Send + Sync {
    async fn search_by_isin(&self, isin: &str) -> Option<TickerInfo>;
}
