//! Ticker metadata and the structural views of primary-source payloads.

use serde::{Deserialize, Serialize};

/// Resolved ticker metadata, cached by ISIN.
///
/// Produced by primary lookups or the discovery fallback. Prices are
/// deliberately absent: metadata changes rarely and caches well, prices
/// change continuously and must never be served stale.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TickerInfo {
    /// Exchange-qualified ticker (e.g., "NATO.L")
    pub symbol: String,

    /// Display name
    pub name: String,

    /// Human-readable exchange name, or "Unknown"
    pub exchange: String,

    /// ISO currency code, best guess
    pub currency: String,
}

/// A single hit from the primary source's generic search.
///
/// Modeled as a small structural type rather than an open map so the
/// resolution pipeline's field access stays explicit.
#[derive(Clone, Debug, Default)]
pub struct SearchCandidate {
    pub symbol: Option<String>,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
}

impl SearchCandidate {
    /// Best available display name for this candidate.
    pub fn display_name(&self) -> Option<&str> {
        self.long_name.as_deref().or(self.short_name.as_deref())
    }
}

/// Structural view of the primary source's full ticker info payload.
#[derive(Clone, Debug, Default)]
pub struct TickerSnapshot {
    /// Last reported price, if any. Kept as the raw float the source
    /// reports; validity (finite, positive) is the engine's concern.
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub exchange: Option<String>,
    /// Source-reported classification (e.g., "EQUITY", "ETF")
    pub quote_type: Option<String>,
    pub long_name: Option<String>,
    pub short_name: Option<String>,
}

/// Lightweight price snapshot from the primary source's fast path.
#[derive(Clone, Debug, Default)]
pub struct PriceSnapshot {
    pub price: Option<f64>,
    pub currency: Option<String>,
}
