//! Instrument resolution: the multi-stage ISIN pipeline and its tables.

mod engine;
mod exchange_suffixes;
mod name_cleaning;

pub use engine::ResolutionEngine;
pub use exchange_suffixes::{exchange_for_symbol, CANDIDATE_SUFFIXES, US_DEFAULT_EXCHANGE};
pub use name_cleaning::clean_fund_name;
