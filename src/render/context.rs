use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::{Discount, Invoice, InvoiceItem, Party, Totals};

/// Everything a template needs, already calculated and formatted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceContext {
    pub name: String,
    pub serial_number: String,
    pub date: String,
    pub due_date: String,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub logo: Option<String>,
    pub seller: Party,
    pub buyer: Party,
    pub items: Vec<ItemRow>,
    pub totals: TotalsContext,
    pub currency_code: String,
    pub currency_fraction: String,
    pub has_item_units: bool,
    pub has_item_discount: bool,
    pub has_item_tax: bool,
    pub table_columns: usize,
    pub user_data: Option<serde_json::Value>,
}

/// One row of the item table. Money fields are formatted strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemRow {
    pub title: String,
    pub description: Option<String>,
    pub units: Option<String>,
    pub quantity: String,
    pub price_per_unit: String,
    pub subtotal: String,
    /// Formatted discount amount, when the item has a discount.
    pub discount: Option<String>,
    /// "10%" for percentage discounts.
    pub discount_percentage: Option<String>,
    /// Formatted tax amount, when the item has a tax rate.
    pub tax: Option<String>,
    pub tax_rate: Option<String>,
    pub total: String,
}

/// Formatted totals plus the raw numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalsContext {
    pub items_subtotal: String,
    /// Present when an invoice-level discount is set.
    pub discount: Option<String>,
    pub discount_percentage: Option<String>,
    pub total_discount: String,
    /// Present when shipping is non-zero.
    pub shipping: Option<String>,
    pub taxable_amount: String,
    pub tax_rate: Option<String>,
    pub total_tax: String,
    pub total_amount: String,
    pub raw: Totals,
}

impl InvoiceContext {
    pub fn from_invoice(invoice: &Invoice) -> Self {
        let money = |value: Decimal| invoice.format_currency(value);
        let totals = &invoice.totals;

        Self {
            name: invoice.name.clone(),
            serial_number: invoice.serial_number(),
            date: invoice.formatted_date(),
            due_date: invoice.formatted_due_date(),
            status: invoice.status.clone(),
            notes: invoice.notes.clone(),
            logo: invoice.logo.clone(),
            seller: invoice.seller.clone(),
            buyer: invoice.buyer.clone(),
            items: invoice
                .items
                .iter()
                .map(|item| ItemRow::from_item(item, &money))
                .collect(),
            totals: TotalsContext {
                items_subtotal: money(totals.items_subtotal),
                discount: invoice.discount.map(|_| money(totals.invoice_discount)),
                discount_percentage: percentage_label(invoice.discount),
                total_discount: money(totals.total_discount()),
                shipping: (!invoice.shipping.is_zero()).then(|| money(invoice.shipping)),
                taxable_amount: money(totals.taxable_amount),
                tax_rate: invoice.tax_rate.map(percent),
                total_tax: money(totals.total_tax),
                total_amount: money(totals.total_amount),
                raw: totals.clone(),
            },
            currency_code: invoice.currency.code.to_ascii_uppercase(),
            currency_fraction: invoice.currency.fraction.clone(),
            has_item_units: invoice.has_item_units(),
            has_item_discount: invoice.has_item_discount(),
            has_item_tax: invoice.has_item_tax(),
            table_columns: invoice.table_columns(),
            user_data: invoice.user_data.clone(),
        }
    }
}

impl ItemRow {
    fn from_item(item: &InvoiceItem, money: &impl Fn(Decimal) -> String) -> Self {
        let amount = |value: Option<Decimal>| money(value.unwrap_or_default());
        Self {
            title: item.title.clone(),
            description: item.description.clone(),
            units: item.units.clone(),
            quantity: item.quantity.normalize().to_string(),
            price_per_unit: money(item.price_per_unit),
            subtotal: amount(item.subtotal),
            discount: item.discount.map(|_| amount(item.discount_amount)),
            discount_percentage: percentage_label(item.discount),
            tax: item.tax_rate.map(|_| amount(item.tax_amount)),
            tax_rate: item.tax_rate.map(percent),
            total: amount(item.total),
        }
    }
}

fn percentage_label(discount: Option<Discount>) -> Option<String> {
    match discount {
        Some(Discount::Percentage(p)) => Some(percent(p)),
        _ => None,
    }
}

fn percent(value: Decimal) -> String {
    format!("{}%", value.normalize())
}
