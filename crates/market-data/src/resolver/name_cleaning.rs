//! Fund name cleaning for name-based searches.
//!
//! Issuer brands and share-class boilerplate drown out the distinctive part
//! of a fund name in search results, so they are stripped before the name
//! is used as a query. The term list is tuned data, not an invariant.

/// Terms stripped from fund names. Parenthesized share classes come before
/// their bare forms so the parentheses go with them.
const GENERIC_TERMS: [&str; 17] = [
    "(Acc)",
    "(Dist)",
    "UCITS",
    "ETF",
    "Acc",
    "Dist",
    "Dis",
    "iShares",
    "Vanguard",
    "Xtrackers",
    "Amundi",
    "Lyxor",
    "SPDR",
    "Invesco",
    "WisdomTree",
    "HSBC",
    "VanEck",
];

/// Cleaning that leaves less than this is too aggressive; the original name
/// wins.
const MIN_CLEANED_LEN: usize = 4;

/// Strip generic and issuer terms from a fund name.
pub fn clean_fund_name(name: &str) -> String {
    let mut cleaned = name.to_string();
    for term in GENERIC_TERMS {
        cleaned = cleaned.replace(term, " ");
    }
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    if cleaned.len() < MIN_CLEANED_LEN {
        name.trim().to_string()
    } else {
        cleaned
    }
}
