//! Listing printed by `pricegap pairs`.

use pricegap_core::{CatalogPair, POPULAR_PAIRS, STABLECOIN_PAIRS};
use std::fmt::Write;

fn write_section(out: &mut String, title: &str, pairs: &[CatalogPair], start: usize) {
    let _ = writeln!(out, "\n{title}:");
    let _ = writeln!(out, "{}", "-".repeat(60));
    for (i, pair) in pairs.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {} ({}/{})",
            start + i,
            pair.name,
            pair.symbol,
            pair.base_currency
        );
    }
}

/// Numbered popular and stablecoin pairs with a usage hint.
pub fn render_pair_catalog() -> String {
    let mut out = String::new();
    let rule = "=".repeat(60);
    let _ = writeln!(out, "{rule}\n  AVAILABLE CRYPTOCURRENCY PAIRS\n{rule}");

    write_section(&mut out, "Popular Pairs", &POPULAR_PAIRS, 0);
    write_section(&mut out, "Stablecoin Pairs", &STABLECOIN_PAIRS, POPULAR_PAIRS.len());

    let _ = writeln!(out, "\nTo track any of these pairs, use:");
    let _ = writeln!(out, "  pricegap -s SYMBOL -b BASE");
    let _ = writeln!(out, "\nExample:\n  pricegap -s BTC -b USDT");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_numbering() {
        let listing = render_pair_catalog();
        assert!(listing.contains("0. Bitcoin/USDT (BTC/USDT)"));
        assert!(listing.contains("Stablecoin Pairs:"));
        // Stablecoins continue the numbering after the 12 popular pairs.
        assert!(listing.contains("12. "));
        assert!(listing.contains("14. "));
        assert!(!listing.contains("15. "));
    }
}
