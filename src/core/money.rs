//! Money formatting.
//!
//! Amounts are rounded half-away-from-zero to the configured number of
//! decimals, grouped by thousands and substituted into a display template
//! such as `"{VALUE} {SYMBOL}"`.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::currencies::currency;
use super::error::InvoiceError;

/// Largest scale a `Decimal` can carry.
const MAX_DECIMALS: u32 = 28;

/// Currency display configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    /// ISO 4217 code, any case (e.g. "eur").
    pub code: String,
    /// Name of the fractional unit (e.g. "ct.").
    pub fraction: String,
    pub symbol: String,
    pub decimal_point: String,
    pub thousands_separator: String,
    /// Decimal places shown, and the rounding precision for calculations.
    pub decimals: u32,
    /// Display template with `{VALUE}` and `{SYMBOL}` placeholders.
    pub template: String,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            code: "eur".to_string(),
            fraction: "ct.".to_string(),
            symbol: "€".to_string(),
            decimal_point: ".".to_string(),
            thousands_separator: String::new(),
            decimals: 2,
            template: "{VALUE} {SYMBOL}".to_string(),
        }
    }
}

impl CurrencyFormat {
    /// Preset symbol and decimals from an ISO 4217 code. Separators and
    /// template keep their defaults.
    pub fn for_code(code: &str) -> Option<Self> {
        let known = currency(code)?;
        Some(Self {
            code: known.code.to_string(),
            symbol: known.symbol.to_string(),
            decimals: known.minor_units,
            ..Self::default()
        })
    }

    /// Format `value` for display.
    pub fn format(&self, value: Decimal) -> String {
        self.template
            .replace("{VALUE}", &self.format_number(value))
            .replace("{SYMBOL}", &self.symbol)
    }

    /// Format `value` without applying the template.
    pub fn format_number(&self, value: Decimal) -> String {
        format_decimal(
            value,
            self.decimals,
            &self.decimal_point,
            &self.thousands_separator,
        )
    }

    /// Check the decimals against `Decimal`'s scale limit.
    ///
    /// The code is display text and is not checked; codes outside the preset
    /// table are accepted as given.
    pub fn validate(&self) -> Result<(), InvoiceError> {
        if self.decimals > MAX_DECIMALS {
            return Err(InvoiceError::invalid(
                "currency.decimals",
                format!("must be at most {MAX_DECIMALS}, got {}", self.decimals),
            ));
        }
        Ok(())
    }
}

/// Format `value` with the given configuration.
pub fn format_money(value: Decimal, config: &CurrencyFormat) -> String {
    config.format(value)
}

/// Round and group a decimal: `format_decimal(dec!(-1234.5), 2, ".", ",")` is `"-1,234.50"`.
pub fn format_decimal(
    value: Decimal,
    decimals: u32,
    decimal_point: &str,
    thousands_separator: &str,
) -> String {
    let decimals = decimals.min(MAX_DECIMALS);
    let mut rounded =
        value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    rounded.set_sign_positive(true);
    rounded.rescale(decimals);

    let digits = rounded.to_string();
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (digits.as_str(), ""),
    };

    let mut out = String::with_capacity(digits.len() + int_part.len() / 3 + 1);
    if negative {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part, thousands_separator));
    if !frac_part.is_empty() {
        out.push_str(decimal_point);
        out.push_str(frac_part);
    }
    out
}

fn group_thousands(int_part: &str, separator: &str) -> String {
    if separator.is_empty() || int_part.len() <= 3 {
        return int_part.to_string();
    }
    let head = int_part.len() % 3;
    let mut out = String::with_capacity(int_part.len() + separator.len() * (int_part.len() / 3));
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (i + 3 - head) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}
