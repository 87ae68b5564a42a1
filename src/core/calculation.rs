//! Line item and invoice totals arithmetic.
//!
//! All amounts are `Decimal`. Every rounding step uses commercial rounding
//! (half away from zero) to the invoice precision, which is the currency's
//! number of decimals. Sums are exact and never re-rounded.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use super::error::InvoiceError;
use super::types::{Discount, InvoiceItem, Totals};

/// Computed amounts for one line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemAmounts {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub tax: Decimal,
}

/// Calculate a single item from its raw inputs.
///
/// Flat discounts above the subtotal are capped, so `total` is never negative.
pub fn calculate_item(
    price_per_unit: Decimal,
    quantity: Decimal,
    discount: Option<Discount>,
    tax_rate: Option<Decimal>,
    precision: u32,
) -> Result<ItemAmounts, InvoiceError> {
    if price_per_unit.is_sign_negative() && !price_per_unit.is_zero() {
        return Err(InvoiceError::invalid(
            "price_per_unit",
            format!("must not be negative, got {price_per_unit}"),
        ));
    }
    if quantity.is_sign_negative() && !quantity.is_zero() {
        return Err(InvoiceError::invalid(
            "quantity",
            format!("must not be negative, got {quantity}"),
        ));
    }
    check_rate(tax_rate, "tax_rate")?;

    let subtotal = price_per_unit
        .checked_mul(quantity)
        .map(|v| round_half_up(v, precision))
        .ok_or_else(|| overflow("subtotal"))?;
    let discount = discount_amount(discount, subtotal, precision)?;
    let total = subtotal - discount;
    let tax = match tax_rate {
        Some(rate) => percent_of(total, rate, precision).ok_or_else(|| overflow("tax_rate"))?,
        None => Decimal::ZERO,
    };

    Ok(ItemAmounts {
        subtotal,
        discount,
        total,
        tax,
    })
}

impl InvoiceItem {
    /// Compute `subtotal`, `discount_amount`, `total` and `tax_amount`.
    ///
    /// Works from the raw inputs every time, so repeated calls are idempotent.
    /// On error the computed fields are left untouched.
    pub fn calculate(&mut self, precision: u32) -> Result<(), InvoiceError> {
        let amounts = calculate_item(
            self.price_per_unit,
            self.quantity,
            self.discount,
            self.tax_rate,
            precision,
        )?;
        self.subtotal = Some(amounts.subtotal);
        self.discount_amount = Some(amounts.discount);
        self.total = Some(amounts.total);
        self.tax_amount = Some(amounts.tax);
        Ok(())
    }
}

/// Invoice-level inputs to the totals aggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InvoiceAdjustments {
    pub discount: Option<Discount>,
    /// Invoice tax rate in percent.
    pub tax_rate: Option<Decimal>,
    pub shipping: Decimal,
}

/// Calculate every item, then aggregate the invoice totals.
///
/// Item errors carry the item index in their field path (`items[2].quantity`).
/// Item tax and invoice tax are additive: invoice tax applies to the
/// taxable amount, never to item tax.
pub fn calculate_totals(
    items: &mut [InvoiceItem],
    adjustments: &InvoiceAdjustments,
    precision: u32,
) -> Result<Totals, InvoiceError> {
    if adjustments.shipping.is_sign_negative() && !adjustments.shipping.is_zero() {
        return Err(InvoiceError::invalid(
            "shipping",
            format!("must not be negative, got {}", adjustments.shipping),
        ));
    }
    check_rate(adjustments.tax_rate, "tax_rate")?;

    for (i, item) in items.iter_mut().enumerate() {
        item.calculate(precision).map_err(|e| match e {
            InvoiceError::InvalidValue { field, message } => InvoiceError::InvalidValue {
                field: format!("items[{i}].{field}"),
                message: format!("{message} (item '{}')", item.title),
            },
            other => other,
        })?;
    }

    let items_subtotal = checked_sum(items.iter().filter_map(|i| i.total), "items_subtotal")?;
    let items_discount =
        checked_sum(items.iter().filter_map(|i| i.discount_amount), "items_discount")?;
    let items_tax = checked_sum(items.iter().filter_map(|i| i.tax_amount), "items_tax")?;

    let invoice_discount = discount_amount(adjustments.discount, items_subtotal, precision)
        .map_err(|e| e.within("discount"))?;
    let taxable_amount = (items_subtotal - invoice_discount)
        .checked_add(adjustments.shipping)
        .ok_or_else(|| overflow("shipping"))?;
    let invoice_tax = match adjustments.tax_rate {
        Some(rate) => {
            percent_of(taxable_amount, rate, precision).ok_or_else(|| overflow("tax_rate"))?
        }
        None => Decimal::ZERO,
    };
    let total_tax = items_tax
        .checked_add(invoice_tax)
        .ok_or_else(|| overflow("total_tax"))?;
    let total_amount = taxable_amount
        .checked_add(total_tax)
        .ok_or_else(|| overflow("total_amount"))?;

    Ok(Totals {
        items_subtotal,
        items_discount,
        invoice_discount,
        shipping: adjustments.shipping,
        taxable_amount,
        items_tax,
        invoice_tax,
        total_tax,
        total_amount,
    })
}

/// Rounded discount on `base`. Flat amounts are capped at `base`.
fn discount_amount(
    discount: Option<Discount>,
    base: Decimal,
    precision: u32,
) -> Result<Decimal, InvoiceError> {
    match discount {
        None => Ok(Decimal::ZERO),
        Some(Discount::Percentage(p)) => {
            if p < Decimal::ZERO || p > dec!(100) {
                return Err(InvoiceError::invalid(
                    "percentage",
                    format!("must be between 0 and 100, got {p}"),
                ));
            }
            percent_of(base, p, precision).ok_or_else(|| overflow("percentage"))
        }
        Some(Discount::Flat(amount)) => {
            if amount.is_sign_negative() && !amount.is_zero() {
                return Err(InvoiceError::invalid(
                    "amount",
                    format!("flat discount must not be negative, got {amount}"),
                ));
            }
            Ok(round_half_up(amount.min(base), precision))
        }
    }
}

fn check_rate(rate: Option<Decimal>, field: &str) -> Result<(), InvoiceError> {
    match rate {
        Some(rate) if rate.is_sign_negative() && !rate.is_zero() => Err(InvoiceError::invalid(
            field,
            format!("must not be negative, got {rate}"),
        )),
        _ => Ok(()),
    }
}

/// `percent` % of `base`, rounded. `None` on overflow.
fn percent_of(base: Decimal, percent: Decimal, precision: u32) -> Option<Decimal> {
    base.checked_mul(percent)?
        .checked_div(dec!(100))
        .map(|v| round_half_up(v, precision))
}

fn checked_sum(
    mut values: impl Iterator<Item = Decimal>,
    field: &str,
) -> Result<Decimal, InvoiceError> {
    values
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
        .ok_or_else(|| overflow(field))
}

fn overflow(field: &str) -> InvoiceError {
    InvoiceError::invalid(field, "amount overflows")
}

/// Round to `dp` decimal places using half-up (commercial rounding).
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builder::InvoiceItemBuilder;

    fn item(price: Decimal, qty: Decimal) -> InvoiceItem {
        InvoiceItemBuilder::new("Service")
            .price_per_unit(price)
            .quantity(qty)
            .build()
    }

    #[test]
    fn percentage_discount_on_item() {
        let amounts = calculate_item(
            dec!(100),
            dec!(2),
            Some(Discount::Percentage(dec!(10))),
            None,
            2,
        )
        .unwrap();
        assert_eq!(amounts.subtotal, dec!(200));
        assert_eq!(amounts.discount, dec!(20));
        assert_eq!(amounts.total, dec!(180));
        assert_eq!(amounts.tax, dec!(0));
    }

    #[test]
    fn flat_discount_is_capped_at_subtotal() {
        let amounts =
            calculate_item(dec!(5), dec!(3), Some(Discount::Flat(dec!(50))), None, 2).unwrap();
        assert_eq!(amounts.subtotal, dec!(15));
        assert_eq!(amounts.discount, dec!(15));
        assert_eq!(amounts.total, dec!(0));
    }

    #[test]
    fn fractional_quantity_rounds_subtotal() {
        // 3.333 * 1.5 = 4.9995 → 5.00
        let amounts = calculate_item(dec!(3.333), dec!(1.5), None, None, 2).unwrap();
        assert_eq!(amounts.subtotal, dec!(5.00));
    }

    #[test]
    fn item_tax_on_discounted_total() {
        // 19.99 * 3 = 59.97, -5% = 3.00 (2.9985), total 56.97, 19% = 10.8243 → 10.82
        let amounts = calculate_item(
            dec!(19.99),
            dec!(3),
            Some(Discount::Percentage(dec!(5))),
            Some(dec!(19)),
            2,
        )
        .unwrap();
        assert_eq!(amounts.discount, dec!(3.00));
        assert_eq!(amounts.total, dec!(56.97));
        assert_eq!(amounts.tax, dec!(10.82));
    }

    #[test]
    fn rejects_negative_inputs() {
        let err = calculate_item(dec!(-1), dec!(1), None, None, 2).unwrap_err();
        assert!(matches!(err, InvoiceError::InvalidValue { ref field, .. } if field == "price_per_unit"));

        let err = calculate_item(dec!(1), dec!(-0.5), None, None, 2).unwrap_err();
        assert!(matches!(err, InvoiceError::InvalidValue { ref field, .. } if field == "quantity"));

        let err = calculate_item(dec!(1), dec!(1), None, Some(dec!(-7)), 2).unwrap_err();
        assert!(matches!(err, InvoiceError::InvalidValue { ref field, .. } if field == "tax_rate"));

        let err =
            calculate_item(dec!(1), dec!(1), Some(Discount::Flat(dec!(-1))), None, 2).unwrap_err();
        assert!(matches!(err, InvoiceError::InvalidValue { ref field, .. } if field == "amount"));
    }

    #[test]
    fn rejects_percentage_out_of_range() {
        for p in [dec!(-0.01), dec!(100.01), dec!(250)] {
            let err = calculate_item(dec!(1), dec!(1), Some(Discount::Percentage(p)), None, 2)
                .unwrap_err();
            assert!(matches!(err, InvoiceError::InvalidValue { .. }), "p = {p}");
        }
        assert!(
            calculate_item(dec!(1), dec!(1), Some(Discount::Percentage(dec!(100))), None, 2)
                .is_ok()
        );
    }

    #[test]
    fn item_calculate_is_idempotent() {
        let mut it = item(dec!(100), dec!(2));
        it.discount = Some(Discount::Percentage(dec!(10)));
        it.calculate(2).unwrap();
        let first = it.clone();
        it.calculate(2).unwrap();
        assert_eq!(it, first);
        assert_eq!(it.total, Some(dec!(180)));
    }

    #[test]
    fn failed_calculate_leaves_item_untouched() {
        let mut it = item(dec!(10), dec!(1));
        it.calculate(2).unwrap();
        it.quantity = dec!(-1);
        assert!(it.calculate(2).is_err());
        assert_eq!(it.total, Some(dec!(10)));
    }

    #[test]
    fn totals_with_invoice_discount_and_tax() {
        let mut items = vec![item(dec!(10), dec!(2))];
        let totals = calculate_totals(
            &mut items,
            &InvoiceAdjustments {
                discount: Some(Discount::Percentage(dec!(10))),
                tax_rate: Some(dec!(15)),
                shipping: Decimal::ZERO,
            },
            2,
        )
        .unwrap();
        assert_eq!(totals.items_subtotal, dec!(20));
        assert_eq!(totals.invoice_discount, dec!(2));
        assert_eq!(totals.taxable_amount, dec!(18));
        assert_eq!(totals.total_tax, dec!(2.70));
        assert_eq!(totals.total_amount, dec!(20.70));
    }

    #[test]
    fn item_and_invoice_tax_are_additive() {
        let mut taxed = item(dec!(100), dec!(1));
        taxed.tax_rate = Some(dec!(10));
        let mut items = vec![taxed, item(dec!(50), dec!(1))];
        let totals = calculate_totals(
            &mut items,
            &InvoiceAdjustments {
                discount: None,
                tax_rate: Some(dec!(20)),
                shipping: dec!(5),
            },
            2,
        )
        .unwrap();
        // items tax 10; taxable 155; invoice tax 31
        assert_eq!(totals.items_tax, dec!(10));
        assert_eq!(totals.taxable_amount, dec!(155));
        assert_eq!(totals.invoice_tax, dec!(31));
        assert_eq!(totals.total_tax, dec!(41));
        assert_eq!(totals.total_amount, dec!(196));
    }

    #[test]
    fn invoice_flat_discount_is_capped() {
        let mut items = vec![item(dec!(10), dec!(1))];
        let totals = calculate_totals(
            &mut items,
            &InvoiceAdjustments {
                discount: Some(Discount::Flat(dec!(25))),
                tax_rate: None,
                shipping: dec!(4.95),
            },
            2,
        )
        .unwrap();
        assert_eq!(totals.invoice_discount, dec!(10));
        assert_eq!(totals.taxable_amount, dec!(4.95));
        assert_eq!(totals.total_amount, dec!(4.95));
    }

    #[test]
    fn item_error_carries_index_and_title() {
        let mut bad = item(dec!(1), dec!(1));
        bad.title = "Broken".into();
        bad.discount = Some(Discount::Percentage(dec!(120)));
        let mut items = vec![item(dec!(1), dec!(1)), bad];
        let err = calculate_totals(&mut items, &InvoiceAdjustments::default(), 2).unwrap_err();
        match err {
            InvoiceError::InvalidValue { field, message } => {
                assert_eq!(field, "items[1].percentage");
                assert!(message.contains("Broken"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn invoice_discount_error_is_prefixed() {
        let mut items = vec![item(dec!(1), dec!(1))];
        let err = calculate_totals(
            &mut items,
            &InvoiceAdjustments {
                discount: Some(Discount::Percentage(dec!(101))),
                ..InvoiceAdjustments::default()
            },
            2,
        )
        .unwrap_err();
        assert!(
            matches!(err, InvoiceError::InvalidValue { ref field, .. } if field == "discount.percentage")
        );
    }

    #[test]
    fn rejects_negative_shipping() {
        let err = calculate_totals(
            &mut [],
            &InvoiceAdjustments {
                shipping: dec!(-1),
                ..InvoiceAdjustments::default()
            },
            2,
        )
        .unwrap_err();
        assert!(matches!(err, InvoiceError::InvalidValue { ref field, .. } if field == "shipping"));
    }

    #[test]
    fn empty_invoice_is_all_zero() {
        let totals = calculate_totals(&mut [], &InvoiceAdjustments::default(), 2).unwrap();
        assert_eq!(totals, Totals::default());
    }

    #[test]
    fn overflowing_item_is_an_error() {
        let err = calculate_item(dec!(1e28), dec!(10), None, None, 2).unwrap_err();
        assert!(matches!(err, InvoiceError::InvalidValue { ref field, .. } if field == "subtotal"));

        let err = calculate_item(dec!(1e27), dec!(1), None, Some(dec!(100)), 2).unwrap_err();
        assert!(matches!(err, InvoiceError::InvalidValue { ref field, .. } if field == "tax_rate"));
    }

    #[test]
    fn overflowing_totals_are_an_error() {
        let mut items = vec![item(dec!(5e28), dec!(1)), item(dec!(5e28), dec!(1))];
        let err = calculate_totals(&mut items, &InvoiceAdjustments::default(), 2).unwrap_err();
        assert!(
            matches!(err, InvoiceError::InvalidValue { ref field, .. } if field == "items_subtotal")
        );

        let mut items = vec![item(dec!(7e28), dec!(1))];
        let err = calculate_totals(
            &mut items,
            &InvoiceAdjustments {
                shipping: dec!(7e28),
                ..InvoiceAdjustments::default()
            },
            2,
        )
        .unwrap_err();
        assert!(matches!(err, InvoiceError::InvalidValue { ref field, .. } if field == "shipping"));
    }

    #[test]
    fn zero_precision() {
        let amounts = calculate_item(dec!(2.5), dec!(1), None, Some(dec!(50)), 0).unwrap();
        assert_eq!(amounts.subtotal, dec!(3));
        assert_eq!(amounts.tax, dec!(2));
    }
}
