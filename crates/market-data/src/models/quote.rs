//! Quote models.

use chrono::{SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A freshly computed price quote.
///
/// Always recomputed per request, never cached: serving a stale price is
/// worse than a slower lookup.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuoteRecord {
    /// Trading symbol the quote was fetched for
    pub symbol: String,

    /// Price with exactly four decimal places, carried as a string to avoid
    /// floating-point representation drift on the wire
    pub price: String,

    /// Price currency
    pub currency: String,

    /// Capture time, ISO-8601 UTC
    pub time: String,
}

impl QuoteRecord {
    /// Build a quote stamped with the current UTC time.
    pub fn now(symbol: impl Into<String>, price: Decimal, currency: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            price: format!("{:.4}", price.round_dp(4)),
            currency: currency.into(),
            time: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false),
        }
    }
}
