use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::calculation::{InvoiceAdjustments, calculate_totals};
use super::dates::DateSettings;
use super::error::InvoiceError;
use super::money::CurrencyFormat;
use super::numbering::SerialNumber;
use super::types::*;
use crate::config::{self, ConfigProvider, InvoiceDefaults, NoConfig};

/// Upper bound on line items per invoice.
pub const MAX_ITEMS: usize = 10_000;

/// Builder for invoices.
///
/// Starts from configured defaults, accumulates inputs and produces an
/// immutable [`Invoice`] with [`finalize`](Self::finalize).
///
/// ```
/// use invoicer::core::*;
/// use rust_decimal_macros::dec;
///
/// let invoice = InvoiceBuilder::new()
///     .buyer(PartyBuilder::buyer("John Doe").build())
///     .add_item(InvoiceItemBuilder::new("Service 1").price_per_unit(dec!(10)).quantity(dec!(2)).build())
///     .discount_by_percent(dec!(10))
///     .tax_rate(dec!(15))
///     .finalize()
///     .unwrap();
///
/// assert_eq!(invoice.totals.total_amount, dec!(20.70));
/// assert_eq!(invoice.format_currency(invoice.totals.total_amount), "20.70 €");
/// ```
#[derive(Debug, Clone)]
pub struct InvoiceBuilder {
    name: String,
    seller: Party,
    buyer: Option<Party>,
    items: Vec<InvoiceItem>,
    serial_number: SerialNumber,
    dates: DateSettings,
    currency: CurrencyFormat,
    discount: Option<Discount>,
    tax_rate: Option<Decimal>,
    shipping: Decimal,
    template: String,
    filename: Option<String>,
    status: Option<String>,
    notes: Option<String>,
    logo: Option<String>,
    paper: PaperOptions,
    pdf_options: serde_json::Map<String, serde_json::Value>,
    disk: String,
    user_data: Option<serde_json::Value>,
}

impl Default for InvoiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceBuilder {
    /// Builder with literal defaults only.
    pub fn new() -> Self {
        Self::with_config(&NoConfig)
    }

    /// Builder with defaults read from `config`.
    pub fn with_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self::from_defaults(InvoiceDefaults::load(config))
    }

    pub fn from_defaults(defaults: InvoiceDefaults) -> Self {
        Self {
            name: defaults.name,
            seller: defaults.seller,
            buyer: None,
            items: Vec::new(),
            serial_number: defaults.serial_number,
            dates: DateSettings {
                format: defaults.date_format,
                pay_until_days: defaults.pay_until_days,
                ..DateSettings::default()
            },
            currency: defaults.currency,
            discount: None,
            tax_rate: None,
            shipping: Decimal::ZERO,
            template: defaults.template,
            filename: None,
            status: None,
            notes: None,
            logo: None,
            paper: defaults.paper,
            pdf_options: defaults.pdf_options,
            disk: defaults.disk,
            user_data: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn seller(mut self, party: Party) -> Self {
        self.seller = Party {
            role: PartyRole::Seller,
            ..party
        };
        self
    }

    pub fn buyer(mut self, party: Party) -> Self {
        self.buyer = Some(Party {
            role: PartyRole::Buyer,
            ..party
        });
        self
    }

    pub fn add_item(mut self, item: InvoiceItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn add_items(mut self, items: impl IntoIterator<Item = InvoiceItem>) -> Self {
        self.items.extend(items);
        self
    }

    pub fn series(mut self, series: impl Into<String>) -> Self {
        self.serial_number.series = series.into();
        self
    }

    pub fn sequence(mut self, sequence: u64) -> Self {
        self.serial_number.sequence = sequence;
        self
    }

    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.serial_number.delimiter = delimiter.into();
        self
    }

    pub fn sequence_padding(mut self, width: usize) -> Self {
        self.serial_number.padding = width;
        self
    }

    pub fn serial_number_format(mut self, template: impl Into<String>) -> Self {
        self.serial_number.template = template.into();
        self
    }

    /// Replace the whole serial number configuration, e.g. one issued by a
    /// [`SerialNumberSequence`](super::SerialNumberSequence).
    pub fn serial_number(mut self, serial: SerialNumber) -> Self {
        self.serial_number = serial;
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.dates.date = date;
        self
    }

    /// `chrono` strftime pattern, e.g. `"%d.%m.%Y"`.
    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.dates.format = format.into();
        self
    }

    pub fn pay_until_days(mut self, days: u32) -> Self {
        self.dates.pay_until_days = days;
        self
    }

    pub fn currency_code(mut self, code: impl Into<String>) -> Self {
        self.currency.code = code.into();
        self
    }

    pub fn currency_fraction(mut self, fraction: impl Into<String>) -> Self {
        self.currency.fraction = fraction.into();
        self
    }

    pub fn currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency.symbol = symbol.into();
        self
    }

    /// Display decimals; also the rounding precision of every calculation.
    pub fn currency_decimals(mut self, decimals: u32) -> Self {
        self.currency.decimals = decimals;
        self
    }

    pub fn currency_decimal_point(mut self, point: impl Into<String>) -> Self {
        self.currency.decimal_point = point.into();
        self
    }

    pub fn currency_thousands_separator(mut self, separator: impl Into<String>) -> Self {
        self.currency.thousands_separator = separator.into();
        self
    }

    /// Template with `{VALUE}` and `{SYMBOL}` placeholders.
    pub fn currency_format(mut self, template: impl Into<String>) -> Self {
        self.currency.template = template.into();
        self
    }

    /// Replace the whole currency configuration.
    pub fn currency(mut self, currency: CurrencyFormat) -> Self {
        self.currency = currency;
        self
    }

    /// Flat invoice discount. Replaces any earlier discount.
    pub fn discount_by_amount(mut self, amount: Decimal) -> Self {
        self.discount = Some(Discount::Flat(amount));
        self
    }

    /// Percentage invoice discount. Replaces any earlier discount.
    pub fn discount_by_percent(mut self, percent: Decimal) -> Self {
        self.discount = Some(Discount::Percentage(percent));
        self
    }

    pub fn tax_rate(mut self, percent: Decimal) -> Self {
        self.tax_rate = Some(percent);
        self
    }

    pub fn shipping(mut self, amount: Decimal) -> Self {
        self.shipping = amount;
        self
    }

    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// Output filename. `.pdf` is appended when missing.
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn logo(mut self, logo: impl Into<String>) -> Self {
        self.logo = Some(logo.into());
        self
    }

    pub fn paper_size(mut self, size: impl Into<String>) -> Self {
        self.paper.size = size.into();
        self
    }

    pub fn paper_orientation(mut self, orientation: Orientation) -> Self {
        self.paper.orientation = orientation;
        self
    }

    /// Set one PDF engine option.
    pub fn pdf_option(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.pdf_options.insert(key.into(), value.into());
        self
    }

    pub fn disk(mut self, disk: impl Into<String>) -> Self {
        self.disk = disk.into();
        self
    }

    /// Arbitrary data made available to templates.
    pub fn user_data(mut self, data: serde_json::Value) -> Self {
        self.user_data = Some(data);
        self
    }

    /// Calculate every item and the invoice totals, producing the finalized invoice.
    ///
    /// Works on a copy of the accumulated inputs, so calling it again yields
    /// an identical invoice and never applies a discount or tax twice.
    pub fn finalize(&self) -> Result<Invoice, InvoiceError> {
        let buyer = self
            .buyer
            .clone()
            .ok_or_else(|| InvoiceError::Builder("buyer is required".into()))?;

        if self.items.len() > MAX_ITEMS {
            return Err(InvoiceError::Builder(format!(
                "invoice cannot have more than {MAX_ITEMS} items"
            )));
        }

        self.currency.validate()?;
        self.dates.validate()?;
        self.serial_number.validate()?;

        let mut items = self.items.clone();
        let totals = calculate_totals(
            &mut items,
            &InvoiceAdjustments {
                discount: self.discount,
                tax_rate: self.tax_rate,
                shipping: self.shipping,
            },
            self.currency.decimals,
        )?;

        let filename = match &self.filename {
            Some(name) => with_pdf_extension(name),
            None => default_filename(&self.name, &self.serial_number),
        };
        if filename.chars().any(char::is_control) {
            return Err(InvoiceError::invalid(
                "filename",
                "must not contain control characters",
            ));
        }

        tracing::debug!(
            serial_number = %self.serial_number.format(),
            items = items.len(),
            total = %totals.total_amount,
            "invoice finalized"
        );

        Ok(Invoice {
            name: self.name.clone(),
            seller: self.seller.clone(),
            buyer,
            items,
            serial_number: self.serial_number.clone(),
            dates: self.dates.clone(),
            currency: self.currency.clone(),
            discount: self.discount,
            tax_rate: self.tax_rate,
            shipping: self.shipping,
            totals,
            template: self.template.clone(),
            filename,
            status: self.status.clone(),
            notes: self.notes.clone(),
            logo: self.logo.clone(),
            paper: self.paper.clone(),
            pdf_options: self.pdf_options.clone(),
            disk: self.disk.clone(),
            user_data: self.user_data.clone(),
        })
    }
}

fn with_pdf_extension(name: &str) -> String {
    if name.to_ascii_lowercase().ends_with(".pdf") {
        name.to_string()
    } else {
        format!("{name}.pdf")
    }
}

/// Snake-cased invoice name, or `{series}_{sequence}` when the name is blank.
fn default_filename(name: &str, serial: &SerialNumber) -> String {
    let stem = snake_case(name);
    if stem.is_empty() {
        format!("{}_{}.pdf", serial.series, serial.sequence)
    } else {
        format!("{stem}.pdf")
    }
}

fn snake_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    let mut prev_lower = false;
    for ch in input.chars() {
        if ch.is_alphanumeric() {
            if ch.is_uppercase() && prev_lower {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
            prev_lower = ch.is_lowercase() || ch.is_numeric();
        } else {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            prev_lower = false;
        }
    }
    out.trim_end_matches('_').to_string()
}

/// Builder for [`Party`].
#[derive(Debug, Clone)]
pub struct PartyBuilder {
    role: PartyRole,
    name: String,
    address: Option<String>,
    code: Option<String>,
    vat: Option<String>,
    phone: Option<String>,
    custom_fields: BTreeMap<String, String>,
}

impl PartyBuilder {
    pub fn new(role: PartyRole, name: impl Into<String>) -> Self {
        Self {
            role,
            name: name.into(),
            address: None,
            code: None,
            vat: None,
            phone: None,
            custom_fields: BTreeMap::new(),
        }
    }

    pub fn seller(name: impl Into<String>) -> Self {
        Self::new(PartyRole::Seller, name)
    }

    pub fn buyer(name: impl Into<String>) -> Self {
        Self::new(PartyRole::Buyer, name)
    }

    /// Seller pre-filled from `invoices.seller.attributes.*`. Setters override
    /// individual attributes.
    pub fn seller_from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        let seller = config::default_seller(config);
        Self {
            role: PartyRole::Seller,
            name: seller.name,
            address: seller.address,
            code: seller.code,
            vat: seller.vat,
            phone: seller.phone,
            custom_fields: seller.custom_fields,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn vat(mut self, vat: impl Into<String>) -> Self {
        self.vat = Some(vat.into());
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn custom_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_fields.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> Party {
        Party {
            role: self.role,
            name: self.name,
            address: self.address,
            code: self.code,
            vat: self.vat,
            phone: self.phone,
            custom_fields: self.custom_fields,
        }
    }
}

/// Builder for [`InvoiceItem`]. Quantity defaults to 1, price to 0.
#[derive(Debug, Clone)]
pub struct InvoiceItemBuilder {
    title: String,
    description: Option<String>,
    units: Option<String>,
    quantity: Decimal,
    price_per_unit: Decimal,
    discount: Option<Discount>,
    tax_rate: Option<Decimal>,
}

impl InvoiceItemBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            units: None,
            quantity: Decimal::ONE,
            price_per_unit: Decimal::ZERO,
            discount: None,
            tax_rate: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    pub fn quantity(mut self, quantity: Decimal) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn price_per_unit(mut self, price: Decimal) -> Self {
        self.price_per_unit = price;
        self
    }

    /// Flat discount. Replaces any earlier discount.
    pub fn discount_by_amount(mut self, amount: Decimal) -> Self {
        self.discount = Some(Discount::Flat(amount));
        self
    }

    /// Percentage discount. Replaces any earlier discount.
    pub fn discount_by_percent(mut self, percent: Decimal) -> Self {
        self.discount = Some(Discount::Percentage(percent));
        self
    }

    pub fn tax_by_percent(mut self, percent: Decimal) -> Self {
        self.tax_rate = Some(percent);
        self
    }

    pub fn build(self) -> InvoiceItem {
        InvoiceItem {
            title: self.title,
            description: self.description,
            units: self.units,
            quantity: self.quantity,
            price_per_unit: self.price_per_unit,
            discount: self.discount,
            tax_rate: self.tax_rate,
            subtotal: None,
            discount_amount: None,
            total: None,
            tax_amount: None,
        }
    }
}
