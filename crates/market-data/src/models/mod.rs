//! Data models shared across the crate.

mod instrument;
mod quote;
mod ticker;

pub use instrument::{InstrumentRecord, InstrumentType};
pub use quote::QuoteRecord;
pub use ticker::{PriceSnapshot, SearchCandidate, TickerInfo, TickerSnapshot};
