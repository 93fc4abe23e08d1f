//! ISIN shape validation and symbol helpers.
//!
//! Validation is structural only: 2 letters, 9 alphanumerics, 1 trailing
//! digit. The check digit is not verified; the sources queried downstream
//! reject wrong check digits anyway, and a format gate is what keeps
//! malformed input from ever reaching the network.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ISIN_SHAPE: Regex = Regex::new(r"^[A-Z]{2}[A-Z0-9]{9}[0-9]$").unwrap();
}

/// Check whether `code` has the structural shape of an ISIN.
///
/// Case-insensitive; empty input is invalid. Performs no I/O.
pub fn is_valid_isin(code: &str) -> bool {
    if code.is_empty() {
        return false;
    }
    ISIN_SHAPE.is_match(&code.to_uppercase())
}

/// The base part of a symbol: everything before the exchange suffix.
///
/// `"VWRA.L"` -> `"VWRA"`, `"AAPL"` -> `"AAPL"`.
pub fn symbol_base(symbol: &str) -> &str {
    symbol.split('.').next().unwrap_or(symbol)
}
