//! Configuration lookup with literal fallbacks.
//!
//! Invoice defaults (currency, serial number, dates, paper, seller) are read
//! through a [`ConfigProvider`]. Every key has a compile-time default, so a
//! missing provider, a missing key or a value of the wrong type never fails:
//! the literal default is used instead.
//!
//! ```
//! use invoicer::config::{InvoiceDefaults, JsonConfig};
//!
//! let config = JsonConfig::from_json_str(
//!     r#"{ "invoices": { "currency": { "symbol": "$", "format": "{SYMBOL}{VALUE}" } } }"#,
//! )
//! .unwrap();
//! let defaults = InvoiceDefaults::load(&config);
//! assert_eq!(defaults.currency.symbol, "$");
//! assert_eq!(defaults.serial_number.series, "AA");
//! ```

use std::collections::{BTreeMap, HashMap};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::core::{
    CurrencyFormat, InvoiceError, Orientation, PaperOptions, Party, PartyRole, SerialNumber,
    DEFAULT_DATE_FORMAT, DEFAULT_PAY_UNTIL_DAYS,
};

/// Root section every configuration document must have.
pub const ROOT_KEY: &str = "invoices";

/// Read-only key lookup. Keys are dotted paths such as `invoices.currency.code`.
pub trait ConfigProvider {
    /// Raw value at `key`, if present.
    fn value(&self, key: &str) -> Option<Value>;
}

/// Typed lookup falling back to `default` when the key is absent or mistyped.
pub fn get<T, C>(config: &C, key: &str, default: T) -> T
where
    T: DeserializeOwned,
    C: ConfigProvider + ?Sized,
{
    let Some(value) = config.value(key) else {
        return default;
    };
    match serde_json::from_value(value) {
        Ok(typed) => typed,
        Err(err) => {
            tracing::warn!(key, error = %err, "configuration value has the wrong type, using default");
            default
        }
    }
}

/// Provider that never has a value. Every lookup returns the literal default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoConfig;

impl ConfigProvider for NoConfig {
    fn value(&self, _key: &str) -> Option<Value> {
        None
    }
}

/// Nested JSON document resolved by dotted key.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonConfig {
    root: Value,
}

impl JsonConfig {
    /// Wrap an already parsed document. No shape checks are made.
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    /// Parse a document that must contain an `invoices` object at the top.
    pub fn from_json_str(json: &str) -> Result<Self, InvoiceError> {
        let root: Value = serde_json::from_str(json)
            .map_err(|e| InvoiceError::InvalidConfiguration(e.to_string()))?;
        if !root.get(ROOT_KEY).is_some_and(Value::is_object) {
            return Err(InvoiceError::ConfigurationMissing(ROOT_KEY.to_string()));
        }
        Ok(Self { root })
    }
}

impl ConfigProvider for JsonConfig {
    fn value(&self, key: &str) -> Option<Value> {
        key.split('.')
            .try_fold(&self.root, |node, part| node.get(part))
            .cloned()
    }
}

/// Flat map keyed by the full dotted key.
impl ConfigProvider for HashMap<String, Value> {
    fn value(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }
}

impl<C: ConfigProvider + ?Sized> ConfigProvider for &C {
    fn value(&self, key: &str) -> Option<Value> {
        (**self).value(key)
    }
}

/// Every configurable default, resolved once.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDefaults {
    pub name: String,
    pub template: String,
    pub serial_number: SerialNumber,
    pub date_format: String,
    pub pay_until_days: u32,
    pub currency: CurrencyFormat,
    pub paper: PaperOptions,
    pub pdf_options: Map<String, Value>,
    pub disk: String,
    pub seller: Party,
}

impl Default for InvoiceDefaults {
    fn default() -> Self {
        Self::load(&NoConfig)
    }
}

impl InvoiceDefaults {
    pub fn load<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        let serial = SerialNumber::default();
        let currency = CurrencyFormat::default();
        let paper = PaperOptions::default();

        let orientation: String = get(
            config,
            "invoices.paper.orientation",
            paper.orientation.as_str().to_string(),
        );
        let orientation = Orientation::from_name(&orientation).unwrap_or_else(|| {
            tracing::warn!(%orientation, "unknown paper orientation, using portrait");
            Orientation::Portrait
        });

        Self {
            name: "Invoice".to_string(),
            template: "default".to_string(),
            serial_number: SerialNumber {
                series: get(config, "invoices.serial_number.series", serial.series),
                delimiter: get(config, "invoices.serial_number.delimiter", serial.delimiter),
                sequence: get(config, "invoices.serial_number.sequence", serial.sequence),
                padding: get(
                    config,
                    "invoices.serial_number.sequence_padding",
                    serial.padding,
                ),
                template: get(config, "invoices.serial_number.format", serial.template),
            },
            date_format: get(config, "invoices.date.format", DEFAULT_DATE_FORMAT.to_string()),
            pay_until_days: get(config, "invoices.date.pay_until_days", DEFAULT_PAY_UNTIL_DAYS),
            currency: CurrencyFormat {
                code: get(config, "invoices.currency.code", currency.code),
                fraction: get(config, "invoices.currency.fraction", currency.fraction),
                symbol: get(config, "invoices.currency.symbol", currency.symbol),
                decimal_point: get(config, "invoices.currency.decimal_point", currency.decimal_point),
                thousands_separator: get(
                    config,
                    "invoices.currency.thousands_separator",
                    currency.thousands_separator,
                ),
                decimals: get(config, "invoices.currency.decimals", currency.decimals),
                template: get(config, "invoices.currency.format", currency.template),
            },
            paper: PaperOptions {
                size: get(config, "invoices.paper.size", paper.size),
                orientation,
            },
            pdf_options: get(
                config,
                "invoices.pdf_options",
                get(config, "invoices.dompdf_options", Map::new()),
            ),
            disk: get(config, "invoices.disk", "local".to_string()),
            seller: default_seller(config),
        }
    }
}

/// Seller built from `invoices.seller.attributes.*`.
pub fn default_seller<C: ConfigProvider + ?Sized>(config: &C) -> Party {
    Party {
        role: PartyRole::Seller,
        name: get(config, "invoices.seller.attributes.name", "Default Company".to_string()),
        address: Some(get(
            config,
            "invoices.seller.attributes.address",
            "Default Address".to_string(),
        )),
        code: Some(get(config, "invoices.seller.attributes.code", "DEFAULT".to_string())),
        vat: Some(get(config, "invoices.seller.attributes.vat", "VAT123456".to_string())),
        phone: Some(get(
            config,
            "invoices.seller.attributes.phone",
            "+1234567890".to_string(),
        )),
        custom_fields: get(
            config,
            "invoices.seller.attributes.custom_fields",
            BTreeMap::new(),
        ),
    }
}
