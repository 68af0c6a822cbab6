use serde::Serialize;

use crate::UnsupportedExchangeError;

/// Immutable row of the exchange lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExchangeEntry {
    pub country: &'static str,
    pub suffix: &'static str,
    pub currency: &'static str,
}

impl ExchangeEntry {
    const fn new(country: &'static str, suffix: &'static str, currency: &'static str) -> Self {
        Self {
            country,
            suffix,
            currency,
        }
    }
}

/// Supported exchanges keyed by uppercase country name.
///
/// Order matches the selector shown to users; `USA` is the home exchange and
/// carries no suffix.
pub static EXCHANGES: [ExchangeEntry; 12] = [
    ExchangeEntry::new("USA", "", "USD"),
    ExchangeEntry::new("JAPAN", ".T", "JPY"),
    ExchangeEntry::new("INDIA", ".NS", "INR"),
    ExchangeEntry::new("UK", ".L", "GBP"),
    ExchangeEntry::new("FRANCE", ".PA", "EUR"),
    ExchangeEntry::new("GERMANY", ".DE", "EUR"),
    ExchangeEntry::new("CANADA", ".TO", "CAD"),
    ExchangeEntry::new("AUSTRALIA", ".AX", "AUD"),
    ExchangeEntry::new("HONG KONG", ".HK", "HKD"),
    ExchangeEntry::new("CHINA", ".SS", "CNY"),
    ExchangeEntry::new("SOUTH KOREA", ".KS", "KRW"),
    ExchangeEntry::new("SOUTH AFRICA", ".JO", "ZAR"),
];

/// Exchange-qualified ticker produced by [`resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTicker {
    pub ticker: String,
    pub currency: &'static str,
    pub country: &'static str,
}

/// Map a `(country, base ticker)` pair to the exchange ticker and its currency.
///
/// Both inputs are matched case-insensitively. No I/O happens here, so an
/// unsupported country is rejected before any provider is contacted.
pub fn resolve(country: &str, base_ticker: &str) -> Result<ResolvedTicker, UnsupportedExchangeError> {
    let country = country.trim().to_uppercase();
    let base_ticker = base_ticker.trim().to_uppercase();

    let entry = EXCHANGES
        .iter()
        .find(|entry| entry.country == country)
        .ok_or(UnsupportedExchangeError { country })?;

    Ok(ResolvedTicker {
        ticker: format!("{base_ticker}{}", entry.suffix),
        currency: entry.currency,
        country: entry.country,
    })
}

pub fn supported_countries() -> impl Iterator<Item = &'static str> {
    EXCHANGES.iter().map(|entry| entry.country)
}
