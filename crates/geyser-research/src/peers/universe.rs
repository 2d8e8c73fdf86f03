//! Static peer universe: curated mappings, sector lists and sector ETFs

/// Used when nothing better is known
pub const DEFAULT_PEERS: &[&str] = &["SPY"];
const DEFAULT_ETF: &str = "SPY";
/// Dynamic sector peers are capped at this many
const MAX_SECTOR_PEERS: usize = 5;

const PEER_MAPPING: &[(&str, &[&str])] = &[
    // Semiconductors
    ("NVDA", &["AMD", "INTC", "QCOM", "AVGO", "TXN"]),
    ("AMD", &["NVDA", "INTC", "QCOM", "AVGO", "TXN"]),
    ("INTC", &["NVDA", "AMD", "QCOM", "AVGO", "TXN"]),
    // Software
    ("MSFT", &["AAPL", "GOOGL", "ORCL", "CRM", "ADBE"]),
    ("ORCL", &["MSFT", "CRM", "SAP", "IBM", "ADBE"]),
    ("CRM", &["MSFT", "ORCL", "SAP", "WDAY", "NOW"]),
    ("ADBE", &["MSFT", "CRM", "ORCL", "INTU", "ANSS"]),
    // Big tech
    ("AAPL", &["MSFT", "GOOGL", "AMZN", "META", "SAMSUNG.KS"]),
    ("GOOGL", &["AAPL", "MSFT", "META", "AMZN", "NFLX"]),
    ("GOOG", &["AAPL", "MSFT", "META", "AMZN", "NFLX"]),
    ("META", &["GOOGL", "SNAP", "PINS", "TWTR", "NFLX"]),
    ("AMZN", &["AAPL", "MSFT", "GOOGL", "WMT", "BABA"]),
    // Banks
    ("JPM", &["BAC", "WFC", "C", "GS", "MS"]),
    ("BAC", &["JPM", "WFC", "C", "GS", "USB"]),
    ("WFC", &["JPM", "BAC", "C", "USB", "PNC"]),
    ("GS", &["JPM", "MS", "C", "BAC", "SCHW"]),
    ("MS", &["GS", "JPM", "C", "BAC", "SCHW"]),
    // Pharma
    ("JNJ", &["PFE", "MRK", "ABBV", "LLY", "BMY"]),
    ("PFE", &["JNJ", "MRK", "ABBV", "LLY", "BMY"]),
    ("MRK", &["JNJ", "PFE", "ABBV", "LLY", "BMY"]),
    ("LLY", &["JNJ", "PFE", "MRK", "ABBV", "NVO"]),
    ("ABBV", &["JNJ", "PFE", "MRK", "LLY", "BMY"]),
    // Retail
    ("WMT", &["COST", "TGT", "AMZN", "HD", "LOW"]),
    ("COST", &["WMT", "TGT", "BJ", "KR", "AMZN"]),
    ("TGT", &["WMT", "COST", "KR", "DG", "DLTR"]),
    ("HD", &["LOW", "WMT", "COST", "TGT", "TSCO"]),
    ("LOW", &["HD", "WMT", "COST", "TGT", "TSCO"]),
    // Energy
    ("XOM", &["CVX", "COP", "EOG", "SLB", "OXY"]),
    ("CVX", &["XOM", "COP", "EOG", "SLB", "OXY"]),
    // Automotive
    ("TSLA", &["F", "GM", "TM", "RIVN", "NIO"]),
    ("F", &["GM", "TSLA", "TM", "HMC", "STLA"]),
    ("GM", &["F", "TSLA", "TM", "HMC", "STLA"]),
    // Streaming and entertainment
    ("NFLX", &["DIS", "WBD", "PARA", "CMCSA", "ROKU"]),
    ("DIS", &["NFLX", "WBD", "PARA", "CMCSA", "ROKU"]),
];

const SECTOR_PEERS: &[(&str, &[&str])] = &[
    ("Technology", &["AAPL", "MSFT", "GOOGL", "META", "NVDA", "AMD", "INTC"]),
    ("Financial Services", &["JPM", "BAC", "WFC", "GS", "MS", "C"]),
    ("Healthcare", &["JNJ", "PFE", "MRK", "ABBV", "LLY", "UNH"]),
    ("Consumer Cyclical", &["AMZN", "TSLA", "HD", "NKE", "MCD", "SBUX"]),
    ("Consumer Defensive", &["WMT", "PG", "KO", "PEP", "COST", "CL"]),
    ("Energy", &["XOM", "CVX", "COP", "EOG", "SLB", "OXY"]),
    ("Industrials", &["CAT", "DE", "BA", "HON", "UPS", "RTX"]),
    ("Communication Services", &["GOOGL", "META", "DIS", "NFLX", "T", "VZ"]),
    ("Utilities", &["NEE", "DUK", "SO", "D", "AEP", "XEL"]),
    ("Real Estate", &["PLD", "AMT", "CCI", "EQIX", "SPG", "O"]),
    ("Materials", &["LIN", "APD", "ECL", "SHW", "FCX", "NEM"]),
];

const SECTOR_ETFS: &[(&str, &str)] = &[
    ("Technology", "XLK"),
    ("Financial Services", "XLF"),
    ("Healthcare", "XLV"),
    ("Consumer Cyclical", "XLY"),
    ("Consumer Defensive", "XLP"),
    ("Energy", "XLE"),
    ("Industrials", "XLI"),
    ("Materials", "XLB"),
    ("Utilities", "XLU"),
    ("Real Estate", "XLRE"),
    ("Communication Services", "XLC"),
];

/// Provider sector labels that differ from the canonical names
const SECTOR_ALIASES: &[(&str, &str)] = &[
    ("finance", "Financial Services"),
    ("financial", "Financial Services"),
    ("health care", "Healthcare"),
    ("life sciences", "Healthcare"),
    ("energy & transportation", "Energy"),
    ("real estate & construction", "Real Estate"),
    ("manufacturing", "Industrials"),
    ("trade & services", "Consumer Cyclical"),
];

/// Canonical sector name for a provider label, case-insensitive
pub fn canonical_sector(sector: &str) -> Option<&'static str> {
    let sector = sector.trim();
    SECTOR_PEERS
        .iter()
        .map(|(name, _)| *name)
        .find(|name| name.eq_ignore_ascii_case(sector))
        .or_else(|| {
            SECTOR_ALIASES
                .iter()
                .find(|(alias, _)| alias.eq_ignore_ascii_case(sector))
                .map(|(_, name)| *name)
        })
}

/// Curated peers for a ticker
pub fn mapped_peers(ticker: &str) -> Option<&'static [&'static str]> {
    PEER_MAPPING
        .iter()
        .find(|(t, _)| t.eq_ignore_ascii_case(ticker))
        .map(|(_, peers)| *peers)
}

/// Large caps from the same sector, excluding the target
pub fn sector_peers(ticker: &str, sector: &str) -> Vec<String> {
    let Some(sector) = canonical_sector(sector) else {
        return Vec::new();
    };
    SECTOR_PEERS
        .iter()
        .find(|(name, _)| *name == sector)
        .map(|(_, peers)| {
            peers
                .iter()
                .filter(|p| !p.eq_ignore_ascii_case(ticker))
                .take(MAX_SECTOR_PEERS)
                .map(|p| (*p).to_string())
                .collect()
        })
        .unwrap_or_default()
}

/// Sector ETF, `SPY` when the sector is unknown
pub fn sector_etf(sector: &str) -> &'static str {
    canonical_sector(sector)
        .and_then(|s| SECTOR_ETFS.iter().find(|(name, _)| *name == s))
        .map_or(DEFAULT_ETF, |(_, etf)| *etf)
}

/// Custom list, then curated mapping, then sector list, then `SPY`
pub fn identify_peers(ticker: &str, sector: Option<&str>, custom: &[String]) -> Vec<String> {
    if !custom.is_empty() {
        return custom.iter().map(|p| p.trim().to_uppercase()).collect();
    }
    if let Some(peers) = mapped_peers(ticker) {
        return peers.iter().map(|p| (*p).to_string()).collect();
    }
    let dynamic = sector.map(|s| sector_peers(ticker, s)).unwrap_or_default();
    if dynamic.is_empty() {
        DEFAULT_PEERS.iter().map(|p| (*p).to_string()).collect()
    } else {
        dynamic
    }
}
