//! API-facing instrument models.

use serde::{Deserialize, Serialize};

/// Instrument classification reported to API consumers.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentType {
    Stock,
    Etf,
}

/// A resolved instrument, derived per request from ticker metadata plus the
/// primary source's classification. Never mutated, never cached (only the
/// underlying [`TickerInfo`](super::TickerInfo) is).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InstrumentRecord {
    /// The ISIN the caller asked for
    pub isin: String,

    /// Exchange-qualified trading symbol
    pub symbol: String,

    /// Display name
    pub name: String,

    /// Classification, serialized as "stock" or "etf"
    #[serde(rename = "type")]
    pub instrument_type: InstrumentType,

    /// Trading currency
    pub currency: String,

    /// Exchange name
    pub exchange: String,
}
