//! ISO 4217 currency table.
//!
//! Each entry carries the display symbol and the number of minor units, so a
//! [`CurrencyFormat`](super::CurrencyFormat) can be preset from a code alone.

/// A known currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Currency {
    /// Upper-case ISO 4217 code.
    pub code: &'static str,
    pub symbol: &'static str,
    /// ISO 4217 minor units (2 for cents, 0 for yen).
    pub minor_units: u32,
}

/// Look up a currency by ISO 4217 code, case insensitive.
pub fn currency(code: &str) -> Option<&'static Currency> {
    let code = code.to_ascii_uppercase();
    CURRENCIES
        .binary_search_by(|c| c.code.cmp(code.as_str()))
        .ok()
        .map(|i| &CURRENCIES[i])
}

/// Check whether `code` is a known ISO 4217 currency code (upper case).
pub fn is_known_currency_code(code: &str) -> bool {
    CURRENCIES.binary_search_by(|c| c.code.cmp(code)).is_ok()
}

const fn c(code: &'static str, symbol: &'static str, minor_units: u32) -> Currency {
    Currency {
        code,
        symbol,
        minor_units,
    }
}

/// Sorted by code for binary search.
static CURRENCIES: &[Currency] = &[
    c("AED", "د.إ", 2),
    c("AUD", "A$", 2),
    c("BGN", "лв", 2),
    c("BRL", "R$", 2),
    c("CAD", "C$", 2),
    c("CHF", "CHF", 2),
    c("CNY", "¥", 2),
    c("CZK", "Kč", 2),
    c("DKK", "kr", 2),
    c("EUR", "€", 2),
    c("GBP", "£", 2),
    c("HKD", "HK$", 2),
    c("HUF", "Ft", 2),
    c("IDR", "Rp", 2),
    c("ILS", "₪", 2),
    c("INR", "₹", 2),
    c("ISK", "kr", 0),
    c("JPY", "¥", 0),
    c("KRW", "₩", 0),
    c("KWD", "د.ك", 3),
    c("MXN", "$", 2),
    c("NOK", "kr", 2),
    c("NZD", "NZ$", 2),
    c("PHP", "₱", 2),
    c("PLN", "zł", 2),
    c("RON", "lei", 2),
    c("SAR", "﷼", 2),
    c("SEK", "kr", 2),
    c("SGD", "S$", 2),
    c("THB", "฿", 2),
    c("TRY", "₺", 2),
    c("UAH", "₴", 2),
    c("USD", "$", 2),
    c("ZAR", "R", 2),
];
