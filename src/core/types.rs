use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::dates::DateSettings;
use super::money::CurrencyFormat;
use super::numbering::SerialNumber;

/// Base column count of the item table (title, quantity, price, total).
pub const TABLE_COLUMNS: usize = 4;

/// A finalized invoice. Produced by [`InvoiceBuilder::finalize`](super::InvoiceBuilder::finalize).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Document title (e.g. "Invoice", "Receipt").
    pub name: String,
    /// Issuing party.
    pub seller: Party,
    /// Receiving party.
    pub buyer: Party,
    /// Line items, in insertion order, with computed fields set.
    pub items: Vec<InvoiceItem>,
    /// Serial number configuration.
    pub serial_number: SerialNumber,
    /// Issue date, display format and payment term.
    pub dates: DateSettings,
    /// Currency display configuration. `decimals` is also the rounding precision.
    pub currency: CurrencyFormat,
    /// Invoice-level discount, applied to the sum of item totals.
    pub discount: Option<Discount>,
    /// Invoice-level tax rate in percent, applied to the taxable amount.
    pub tax_rate: Option<Decimal>,
    /// Shipping amount, added before invoice-level tax.
    pub shipping: Decimal,
    /// Derived totals.
    pub totals: Totals,
    /// Template identifier handed to the HTML renderer.
    pub template: String,
    /// Output filename, always ending in `.pdf`.
    pub filename: String,
    /// Free-form status label (e.g. "paid").
    pub status: Option<String>,
    /// Free-text notes printed below the items.
    pub notes: Option<String>,
    /// Logo path or URL.
    pub logo: Option<String>,
    /// Paper size and orientation for the PDF engine.
    pub paper: PaperOptions,
    /// Engine-specific options, passed through to the PDF renderer.
    pub pdf_options: serde_json::Map<String, serde_json::Value>,
    /// Storage disk name used when saving.
    pub disk: String,
    /// Arbitrary caller data exposed to templates.
    pub user_data: Option<serde_json::Value>,
}

/// Role a party plays on an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartyRole {
    Seller,
    Buyer,
}

/// Seller or buyer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub role: PartyRole,
    pub name: String,
    pub address: Option<String>,
    /// Customer or company code.
    pub code: Option<String>,
    /// Tax identifier.
    pub vat: Option<String>,
    pub phone: Option<String>,
    /// Extra labelled fields printed with the party (e.g. "email").
    pub custom_fields: BTreeMap<String, String>,
}

/// Discount specification. Flat amounts are capped at the amount they apply to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Discount {
    /// Fixed amount in invoice currency.
    Flat(Decimal),
    /// Percentage in `[0, 100]`.
    Percentage(Decimal),
}

impl Discount {
    pub fn is_percentage(&self) -> bool {
        matches!(self, Self::Percentage(_))
    }
}

/// A single billable entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub title: String,
    pub description: Option<String>,
    /// Unit label (e.g. "h", "kg", "pcs").
    pub units: Option<String>,
    /// Quantity, may be fractional.
    pub quantity: Decimal,
    pub price_per_unit: Decimal,
    pub discount: Option<Discount>,
    /// Per-item tax rate in percent.
    pub tax_rate: Option<Decimal>,
    /// `price_per_unit * quantity`, rounded. Set by `calculate()`.
    pub subtotal: Option<Decimal>,
    /// Discount in currency. Set by `calculate()`.
    pub discount_amount: Option<Decimal>,
    /// `subtotal - discount_amount`. Set by `calculate()`.
    pub total: Option<Decimal>,
    /// Tax on `total`; zero when no tax rate is set. Set by `calculate()`.
    pub tax_amount: Option<Decimal>,
}

impl InvoiceItem {
    /// True once `calculate()` has run.
    pub fn is_calculated(&self) -> bool {
        self.total.is_some()
    }

    pub fn has_units(&self) -> bool {
        self.units.is_some()
    }

    pub fn has_discount(&self) -> bool {
        self.discount.is_some()
    }

    pub fn has_tax(&self) -> bool {
        self.tax_rate.is_some()
    }
}

/// Invoice totals, all in invoice currency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Sum of item totals (after item discounts, before tax).
    pub items_subtotal: Decimal,
    /// Sum of item discounts. Already reflected in `items_subtotal`.
    pub items_discount: Decimal,
    /// Invoice-level discount amount.
    pub invoice_discount: Decimal,
    pub shipping: Decimal,
    /// `items_subtotal - invoice_discount + shipping`.
    pub taxable_amount: Decimal,
    /// Sum of per-item taxes.
    pub items_tax: Decimal,
    /// Invoice-level tax on `taxable_amount`.
    pub invoice_tax: Decimal,
    /// `items_tax + invoice_tax`.
    pub total_tax: Decimal,
    /// `taxable_amount + total_tax`.
    pub total_amount: Decimal,
}

impl Totals {
    /// Item and invoice discounts combined.
    pub fn total_discount(&self) -> Decimal {
        self.items_discount + self.invoice_discount
    }
}

/// Paper layout for the PDF engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperOptions {
    /// Paper size name understood by the engine (e.g. "a4", "letter").
    pub size: String,
    pub orientation: Orientation,
}

impl Default for PaperOptions {
    fn default() -> Self {
        Self {
            size: "a4".to_string(),
            orientation: Orientation::Portrait,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Portrait => "portrait",
            Self::Landscape => "landscape",
        }
    }

    /// Parse an orientation name, case insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "portrait" => Some(Self::Portrait),
            "landscape" => Some(Self::Landscape),
            _ => None,
        }
    }
}

impl Invoice {
    /// Formatted serial number, e.g. "AA.00001".
    pub fn serial_number(&self) -> String {
        self.serial_number.format()
    }

    /// Format an amount with this invoice's currency settings.
    pub fn format_currency(&self, value: Decimal) -> String {
        self.currency.format(value)
    }

    pub fn formatted_date(&self) -> String {
        self.dates.formatted_date()
    }

    pub fn formatted_due_date(&self) -> String {
        self.dates.formatted_due_date()
    }

    pub fn has_item_units(&self) -> bool {
        self.items.iter().any(InvoiceItem::has_units)
    }

    pub fn has_item_discount(&self) -> bool {
        self.items.iter().any(InvoiceItem::has_discount)
    }

    pub fn has_item_tax(&self) -> bool {
        self.items.iter().any(InvoiceItem::has_tax)
    }

    /// Number of columns the item table needs.
    pub fn table_columns(&self) -> usize {
        TABLE_COLUMNS
            + usize::from(self.has_item_units())
            + usize::from(self.has_item_discount())
            + usize::from(self.has_item_tax())
    }
}
