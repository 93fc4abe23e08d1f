//! QuoteDesk Market Data Crate
//!
//! This crate turns ISIN codes into priced trading symbols, aggregating a
//! primary market-data source with a scraping-based fallback.
//!
//! # Overview
//!
//! The crate supports:
//! - ISIN format validation with zero I/O
//! - Multi-stage symbol resolution with suffix sweeps and name searches
//! - A scraping fallback gated by a cooldown circuit breaker
//! - Metadata caching over a Redis-compatible backend
//! - Concurrent batch fan-out with per-item outcomes
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |      Caller      | --> | ResolutionEngine |  (multi-stage pipeline)
//! +------------------+     +------------------+
//!                             |            |
//!                             v            v
//!                  +---------------+  +-------------------+
//!                  | PrimaryClient |  | DiscoveryProvider |  (fallback)
//!                  +---------------+  +-------------------+
//!                                        |            |
//!                                        v            v
//!                               +---------------+  +----------------+
//!                               | MetadataCache |  | CircuitBreaker |
//!                               +---------------+  +----------------+
//! ```
//!
//! # Core Types
//!
//! - [`InstrumentRecord`] - A resolved, priced instrument
//! - [`QuoteRecord`] - A freshly computed price quote
//! - [`TickerInfo`] - Ticker metadata, cached by ISIN
//! - [`ResolutionEngine`] - The resolution pipeline itself

pub mod batch;
pub mod cache;
pub mod errors;
pub mod isin;
pub mod models;
pub mod provider;
pub mod resolver;

// Re-export all public types from models
pub use models::{
    InstrumentRecord, InstrumentType, PriceSnapshot, QuoteRecord, SearchCandidate, TickerInfo,
    TickerSnapshot,
};

// Re-export resolver types
pub use resolver::{clean_fund_name, exchange_for_symbol, ResolutionEngine, CANDIDATE_SUFFIXES};

// Re-export provider types
pub use provider::{CircuitBreaker, DiscoveryProvider, JustEtfProvider, PrimaryClient, YahooClient};

// Re-export cache and batch types
pub use batch::{run_batch, BatchError, BatchOutcome};
pub use cache::{KeyValueStore, MetadataCache};
pub use errors::MarketDataError;
pub use isin::{is_valid_isin, symbol_base};
