//! Error types for the market data crate.
//!
//! Resolution deliberately keeps its error surface small: "not found" is a
//! value (`Ok(None)`), not an error. Only failures of the primary source's
//! initial call escape the engine, so the caller can distinguish "source is
//! down" from "instrument does not exist".

use thiserror::Error;

/// Errors that can escape market data operations.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// A provider rejected or could not service the request.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}
