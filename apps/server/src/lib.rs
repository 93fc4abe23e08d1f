//! QuoteDesk server library.
//!
//! Split out of the binary so integration tests can build the router
//! against their own state.

pub mod api;
pub mod config;
pub mod error;
pub mod main_lib;
pub mod models;

pub use main_lib::{build_state, AppState};
