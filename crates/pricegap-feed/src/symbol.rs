//! Symbol normalization.
//!
//! Maps a generic `(symbol, base)` pair into the identifier each source
//! expects. Never fails: unknown legs pass through in the venue's casing.

use pricegap_core::SourceId;
use std::fmt;

/// Venue-specific identifier for a pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceIdentifier {
    /// Exchange pair code ("ETHUSDT", "XBTUSD").
    Pair(String),
    /// Aggregator coin slug and quote currency ("bitcoin", "tether").
    Slug { coin_id: String, currency: String },
}

impl fmt::Display for SourceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pair(pair) => write!(f, "{pair}"),
            Self::Slug { coin_id, currency } => write!(f, "{coin_id}/{currency}"),
        }
    }
}

/// Kraken asset codes for symbols with a legacy X-prefixed spelling.
const KRAKEN_SYMBOLS: &[(&str, &str)] = &[
    ("BTC", "XXBT"),
    ("ETH", "XETH"),
    ("LTC", "XLTC"),
    ("XRP", "XXRP"),
    ("ETC", "XETC"),
    ("ZEC", "XZEC"),
    ("XMR", "XXMR"),
    ("DASH", "DASH"),
    ("EOS", "EOS"),
    ("BCH", "BCH"),
    ("ADA", "ADA"),
    ("ATOM", "ATOM"),
    ("LINK", "LINK"),
    ("DOT", "DOT"),
    ("SOL", "SOL"),
    ("DOGE", "DOGE"),
    ("USDT", "USDT"),
];

/// Kraken quote currency codes (fiat carry a Z prefix).
const KRAKEN_CURRENCIES: &[(&str, &str)] = &[
    ("USD", "ZUSD"),
    ("EUR", "ZEUR"),
    ("GBP", "ZGBP"),
    ("JPY", "ZJPY"),
    ("CAD", "ZCAD"),
    ("AUD", "ZAUD"),
    ("USDT", "USDT"),
    ("USDC", "USDC"),
];

/// Pairs Kraken lists under a spelling other than the composed one.
/// Applied after composition and always wins.
const KRAKEN_EXCEPTIONS: &[(&str, &str)] = &[
    ("XETHUSDT", "ETHUSDT"),
    ("XXBTUSDT", "XBTUSDT"),
    ("ADAUSDT", "ADAUSDT"),
    ("DOTUSDT", "DOTUSDT"),
    ("SOLUSDT", "SOLUSDT"),
    ("DOGEUSDT", "DOGEUSDT"),
    ("XXRPUSDT", "XRPUSDT"),
    ("LINKUSDT", "LINKUSDT"),
    ("XETHZUSD", "ETHUSD"),
    ("XXBTZUSD", "XBTUSD"),
    ("ADAZUSD", "ADAUSD"),
    ("DOTZUSD", "DOTUSD"),
    ("SOLZUSD", "SOLUSD"),
    ("DOGEZUSD", "DOGEUSD"),
    ("XXRPZUSD", "XRPUSD"),
    ("LINKZUSD", "LINKUSD"),
    ("XETHZEUR", "ETHEUR"),
    ("XXBTZEUR", "XBTEUR"),
];

const COINGECKO_COINS: &[(&str, &str)] = &[
    ("btc", "bitcoin"),
    ("eth", "ethereum"),
    ("xrp", "ripple"),
    ("ltc", "litecoin"),
    ("bch", "bitcoin-cash"),
    ("ada", "cardano"),
    ("dot", "polkadot"),
    ("sol", "solana"),
    ("doge", "dogecoin"),
    ("link", "chainlink"),
    ("uni", "uniswap"),
    ("xlm", "stellar"),
    ("matic", "matic-network"),
    ("avax", "avalanche-2"),
    ("atom", "cosmos"),
    ("algo", "algorand"),
    ("fil", "filecoin"),
    ("vet", "vechain"),
    ("etc", "ethereum-classic"),
    ("theta", "theta-token"),
    ("trx", "tron"),
    ("axs", "axie-infinity"),
    ("icp", "internet-computer"),
    ("xtz", "tezos"),
    ("ftm", "fantom"),
    ("near", "near"),
    ("egld", "elrond-erd-2"),
    ("xmr", "monero"),
    ("flow", "flow"),
    ("hbar", "hedera-hashgraph"),
    ("eos", "eos"),
    ("cake", "pancakeswap-token"),
    ("qnt", "quant-network"),
    ("xec", "ecash"),
    ("mana", "decentraland"),
    ("sand", "the-sandbox"),
    ("enj", "enjincoin"),
    ("stx", "blockstack"),
    ("gala", "gala"),
    ("one", "harmony"),
    ("chz", "chiliz"),
    ("hot", "holotoken"),
    ("kcs", "kucoin-shares"),
    ("neo", "neo"),
    ("btt", "bittorrent"),
    ("waves", "waves"),
    ("mkr", "maker"),
    ("hnt", "helium"),
    ("dash", "dash"),
    ("zec", "zcash"),
];

/// CoinGecko currency slugs. Every key here is a USD-pegged stablecoin.
const COINGECKO_CURRENCIES: &[(&str, &str)] = &[
    ("usdt", "tether"),
    ("usdc", "usd-coin"),
    ("busd", "binance-usd"),
    ("dai", "dai"),
    ("ust", "terrausd"),
    ("tusd", "true-usd"),
    ("usdp", "paxos-standard"),
    ("gusd", "gemini-dollar"),
];

fn lookup<'a>(table: &[(&str, &'a str)], key: &str) -> Option<&'a str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Binance pair code: uppercase concatenation.
pub fn binance_symbol(symbol: &str, base: &str) -> String {
    format!(
        "{}{}",
        symbol.trim().to_ascii_uppercase(),
        base.trim().to_ascii_uppercase()
    )
}

/// Kraken pair code: table lookups, composition, then the exception table.
pub fn kraken_pair(symbol: &str, base: &str) -> String {
    let symbol = symbol.trim().to_ascii_uppercase();
    let base = base.trim().to_ascii_uppercase();

    let asset = lookup(KRAKEN_SYMBOLS, &symbol).unwrap_or(symbol.as_str());
    let quote = lookup(KRAKEN_CURRENCIES, &base).unwrap_or(base.as_str());
    let composed = format!("{asset}{quote}");

    match lookup(KRAKEN_EXCEPTIONS, &composed) {
        Some(exception) => exception.to_string(),
        None => composed,
    }
}

/// CoinGecko coin slug, falling back to the lowercased symbol.
pub fn coingecko_coin_id(symbol: &str) -> String {
    let lower = symbol.trim().to_ascii_lowercase();
    lookup(COINGECKO_COINS, &lower)
        .map(str::to_string)
        .unwrap_or(lower)
}

/// CoinGecko currency slug, falling back to the lowercased base.
pub fn coingecko_currency(base: &str) -> String {
    let lower = base.trim().to_ascii_lowercase();
    lookup(COINGECKO_CURRENCIES, &lower)
        .map(str::to_string)
        .unwrap_or(lower)
}

/// Whether `base` is one of the USD-pegged stablecoins CoinGecko knows.
pub fn is_usd_stablecoin(base: &str) -> bool {
    let lower = base.trim().to_ascii_lowercase();
    lookup(COINGECKO_CURRENCIES, &lower).is_some()
}

/// Identifier for `symbol/base` on `source`.
pub fn normalize(source: SourceId, symbol: &str, base: &str) -> SourceIdentifier {
    match source {
        SourceId::Binance => SourceIdentifier::Pair(binance_symbol(symbol, base)),
        SourceId::Kraken => SourceIdentifier::Pair(kraken_pair(symbol, base)),
        SourceId::CoinGecko => SourceIdentifier::Slug {
            coin_id: coingecko_coin_id(symbol),
            currency: coingecko_currency(base),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binance_concatenates_uppercase() {
        assert_eq!(binance_symbol("eth", "usdt"), "ETHUSDT");
        assert_eq!(
            normalize(SourceId::Binance, "XRP", "USDT"),
            SourceIdentifier::Pair("XRPUSDT".to_string())
        );
    }

    #[test]
    fn test_kraken_exception_overrides_composition() {
        // Composes to XETHZUSD, exception table rewrites it.
        assert_eq!(kraken_pair("ETH", "USD"), "ETHUSD");
        assert_eq!(kraken_pair("btc", "usdt"), "XBTUSDT");
        assert_eq!(kraken_pair("BTC", "EUR"), "XBTEUR");
        assert_eq!(kraken_pair("XRP", "USDT"), "XRPUSDT");
    }

    #[test]
    fn test_kraken_composed_without_exception() {
        assert_eq!(kraken_pair("LTC", "USD"), "XLTCZUSD");
        assert_eq!(kraken_pair("ETH", "GBP"), "XETHZGBP");
        assert_eq!(kraken_pair("ATOM", "EUR"), "ATOMZEUR");
    }

    #[test]
    fn test_kraken_unknown_legs_pass_through() {
        assert_eq!(kraken_pair("pepe", "chf"), "PEPECHF");
    }

    #[test]
    fn test_coingecko_tables() {
        assert_eq!(coingecko_coin_id("BTC"), "bitcoin");
        assert_eq!(coingecko_coin_id("Avax"), "avalanche-2");
        assert_eq!(coingecko_coin_id("PEPE"), "pepe");
        assert_eq!(coingecko_currency("USDT"), "tether");
        assert_eq!(coingecko_currency("USD"), "usd");
        assert_eq!(COINGECKO_COINS.len(), 50);
    }

    #[test]
    fn test_coingecko_normalize_is_slug() {
        assert_eq!(
            normalize(SourceId::CoinGecko, "eth", "usdc"),
            SourceIdentifier::Slug {
                coin_id: "ethereum".to_string(),
                currency: "usd-coin".to_string(),
            }
        );
    }

    #[test]
    fn test_stablecoin_detection() {
        for base in ["USDT", "usdc", "BUSD", "dai", "UST", "TUSD", "USDP", "GUSD"] {
            assert!(is_usd_stablecoin(base), "{base} should be a stablecoin");
        }
        assert!(!is_usd_stablecoin("USD"));
        assert!(!is_usd_stablecoin("EUR"));
    }
}
