//! Company-name to ticker resolution
//!
//! Resolution walks a fixed alias table in declaration order and returns the
//! symbol of the first alias that matches the input. An alias matches when
//! the normalised input equals it, contains it, or is contained by it. The
//! substring rule means short aliases can capture longer names (`"v"` hits
//! `"vale"` before `"visa"`), so table order is part of the behaviour.

/// Known company aliases, lowercase, in match-priority order.
const KNOWN_SYMBOLS: &[(&str, &str)] = &[
    // Brazil (B3)
    ("petrobras", "PETR4.SA"),
    ("vale", "VALE3.SA"),
    ("itaú", "ITUB4.SA"),
    ("itau", "ITUB4.SA"),
    ("bradesco", "BBDC4.SA"),
    ("banco do brasil", "BBAS3.SA"),
    ("ambev", "ABEV3.SA"),
    ("weg", "WEGE3.SA"),
    ("magazine luiza", "MGLU3.SA"),
    ("magalu", "MGLU3.SA"),
    ("nubank", "NU"),
    ("embraer", "EMBR3.SA"),
    ("localiza", "RENT3.SA"),
    ("totvs", "TOTS3.SA"),
    ("raia drogasil", "RADL3.SA"),
    ("suzano", "SUZB3.SA"),
    ("jbs", "JBSS3.SA"),
    ("gerdau", "GGBR4.SA"),
    ("b3", "B3SA3.SA"),
    ("cosan", "CSAN3.SA"),
    ("ultrapar", "UGPA3.SA"),
    ("eneva", "ENEV3.SA"),
    ("engie", "EGIE3.SA"),
    ("taesa", "TAEE11.SA"),
    ("eletrobras", "ELET3.SA"),
    ("copel", "CPLE6.SA"),
    ("sabesp", "SBSP3.SA"),
    // International
    ("apple", "AAPL"),
    ("microsoft", "MSFT"),
    ("google", "GOOGL"),
    ("alphabet", "GOOGL"),
    ("amazon", "AMZN"),
    ("tesla", "TSLA"),
    ("meta", "META"),
    ("facebook", "META"),
    ("netflix", "NFLX"),
    ("nvidia", "NVDA"),
    ("intel", "INTC"),
    ("amd", "AMD"),
    ("samsung", "005930.KS"),
    ("sony", "SONY"),
    ("ibm", "IBM"),
    ("paypal", "PYPL"),
    ("uber", "UBER"),
    ("airbnb", "ABNB"),
    ("spotify", "SPOT"),
    ("twitter", "X"),
    ("snapchat", "SNAP"),
    ("berkshire", "BRK-B"),
    ("jpmorgan", "JPM"),
    ("visa", "V"),
    ("mastercard", "MA"),
    ("coca cola", "KO"),
    ("pepsi", "PEP"),
    ("mcdonalds", "MCD"),
    ("disney", "DIS"),
    ("nike", "NKE"),
    ("boeing", "BA"),
    ("exxon", "XOM"),
    ("chevron", "CVX"),
    ("johnson", "JNJ"),
    ("pfizer", "PFE"),
    ("moderna", "MRNA"),
];

/// The alias table in match-priority order
pub fn known_symbols() -> &'static [(&'static str, &'static str)] {
    KNOWN_SYMBOLS
}

/// Resolve free text to a ticker symbol.
///
/// Returns the symbol of the first matching alias, or the trimmed, uppercased
/// input when nothing matches. Never fails and never checks that the symbol
/// exists.
pub fn resolve(input: &str) -> String {
    let needle = input.trim().to_lowercase();

    let hit = KNOWN_SYMBOLS.iter().find(|(alias, _)| {
        needle == *alias || needle.contains(alias) || alias.contains(needle.as_str())
    });

    match hit {
        Some((alias, symbol)) => {
            tracing::debug!(input, alias, symbol, "Resolved via alias table");
            (*symbol).to_string()
        }
        None => input.trim().to_uppercase(),
    }
}
