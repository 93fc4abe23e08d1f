//! Exchange suffix tables.
//!
//! These tables are tuned data, not invariants: the suffix sweep order
//! reflects where the instruments this service sees are most often listed,
//! and both tables are expected to grow as coverage does.

/// Known market suffixes mapped to a readable exchange name.
const SUFFIX_TO_EXCHANGE: [(&str, &str); 15] = [
    ("L", "London Stock Exchange"),
    ("DE", "Deutsche Börse"),
    ("PA", "Euronext Paris"),
    ("AS", "Euronext Amsterdam"),
    ("BR", "Euronext Brussels"),
    ("MI", "Borsa Italiana"),
    ("MC", "Bolsa de Madrid"),
    ("SW", "SIX Swiss Exchange"),
    ("TO", "Toronto Stock Exchange"),
    ("V", "TSX Venture Exchange"),
    ("AX", "Australian Securities Exchange"),
    ("HK", "Hong Kong Stock Exchange"),
    ("T", "Tokyo Stock Exchange"),
    ("SS", "Shanghai Stock Exchange"),
    ("SZ", "Shenzhen Stock Exchange"),
];

/// Ordered market suffixes tried during the suffix sweep, European venues
/// first, then the suffix-less US listing, then the rest of the world.
pub const CANDIDATE_SUFFIXES: [&str; 13] = [
    ".DE", ".L", ".PA", ".AS", ".MI", ".SW", ".MC", ".BR", "", ".TO", ".AX", ".HK", ".T",
];

/// Exchange label for suffix-less symbols.
pub const US_DEFAULT_EXCHANGE: &str = "NYSE/NASDAQ";

/// Resolve an exchange name from a symbol's suffix.
///
/// Unknown suffixes are passed through as-is; suffix-less symbols map to
/// the US default.
pub fn exchange_for_symbol(symbol: &str) -> String {
    match symbol.rsplit_once('.') {
        Some((_, suffix)) => SUFFIX_TO_EXCHANGE
            .iter()
            .find(|(known, _)| *known == suffix)
            .map(|(_, name)| (*name).to_string())
            .unwrap_or_else(|| suffix.to_string()),
        None => US_DEFAULT_EXCHANGE.to_string(),
    }
}
