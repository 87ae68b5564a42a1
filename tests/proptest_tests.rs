//! Property-based tests for the calculation engine and formatters.

use invoicer::core::*;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn buyer() -> Party {
    PartyBuilder::buyer("Kunde AG").build()
}

// ── Proptest Strategies ─────────────────────────────────────────────────────

/// Price from 0.00 to 99999.99.
fn arb_price() -> impl Strategy<Value = Decimal> {
    (0u64..10_000_000u64).prop_map(|cents| Decimal::new(cents as i64, 2))
}

/// Quantity from 0.000 to 1000.000 (weights and hours are fractional).
fn arb_quantity() -> impl Strategy<Value = Decimal> {
    (0u32..=1_000_000u32).prop_map(|milli| Decimal::new(i64::from(milli), 3))
}

/// Percentage from 0.00 to 100.00.
fn arb_percent() -> impl Strategy<Value = Decimal> {
    (0u32..=10_000u32).prop_map(|basis| Decimal::new(i64::from(basis), 2))
}

fn arb_discount() -> impl Strategy<Value = Option<Discount>> {
    prop_oneof![
        Just(None),
        arb_percent().prop_map(|p| Some(Discount::Percentage(p))),
        arb_price().prop_map(|d| Some(Discount::Flat(d))),
    ]
}

fn arb_tax_rate() -> impl Strategy<Value = Option<Decimal>> {
    prop_oneof![
        Just(None),
        Just(Some(dec!(7))),
        Just(Some(dec!(19))),
        arb_percent().prop_map(Some),
    ]
}

/// Shipping from 0.00 to 999.99, zero a third of the time.
fn arb_shipping() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        Just(Decimal::ZERO),
        (0u32..100_000u32).prop_map(|cents| Decimal::new(i64::from(cents), 2)),
    ]
}

fn arb_item() -> impl Strategy<Value = InvoiceItem> {
    (arb_price(), arb_quantity(), arb_discount(), arb_tax_rate()).prop_map(
        |(price, qty, discount, tax_rate)| InvoiceItem {
            discount,
            tax_rate,
            ..InvoiceItemBuilder::new("Item")
                .price_per_unit(price)
                .quantity(qty)
                .build()
        },
    )
}

fn arb_items() -> impl Strategy<Value = Vec<InvoiceItem>> {
    prop::collection::vec(arb_item(), 1..=8)
}

fn build(
    items: Vec<InvoiceItem>,
    discount: Option<Discount>,
    tax: Option<Decimal>,
    shipping: Decimal,
) -> Invoice {
    let mut builder = InvoiceBuilder::new()
        .buyer(buyer())
        .add_items(items)
        .shipping(shipping);
    builder = match discount {
        Some(Discount::Flat(d)) => builder.discount_by_amount(d),
        Some(Discount::Percentage(p)) => builder.discount_by_percent(p),
        None => builder,
    };
    if let Some(rate) = tax {
        builder = builder.tax_rate(rate);
    }
    builder.finalize().unwrap()
}

// ── Line items ──────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn subtotal_is_rounded_product(price in arb_price(), qty in arb_quantity(), precision in 0u32..=4) {
        let amounts = calculate_item(price, qty, None, None, precision).unwrap();
        prop_assert_eq!(amounts.subtotal, round_half_up(price * qty, precision));
        prop_assert_eq!(amounts.total, amounts.subtotal);
    }

    #[test]
    fn total_never_exceeds_subtotal_nor_goes_negative(
        price in arb_price(),
        qty in arb_quantity(),
        discount in arb_discount(),
    ) {
        let amounts = calculate_item(price, qty, discount, None, 2).unwrap();
        prop_assert!(amounts.total <= amounts.subtotal);
        prop_assert!(amounts.total >= Decimal::ZERO);
        prop_assert_eq!(amounts.total, amounts.subtotal - amounts.discount);
    }

    #[test]
    fn percentage_discount_is_rounded_share(price in arb_price(), qty in arb_quantity(), p in arb_percent()) {
        let amounts = calculate_item(price, qty, Some(Discount::Percentage(p)), None, 2).unwrap();
        prop_assert_eq!(amounts.discount, round_half_up(amounts.subtotal * p / dec!(100), 2));
    }

    #[test]
    fn percentage_out_of_range_is_rejected(p in prop_oneof![
        (1u32..1_000_000u32).prop_map(|x| Decimal::new(-i64::from(x), 2)),
        (10_001u32..1_000_000u32).prop_map(|x| Decimal::new(i64::from(x), 2)),
    ]) {
        let result = calculate_item(dec!(10), dec!(1), Some(Discount::Percentage(p)), None, 2);
        let is_invalid_value = matches!(result, Err(InvoiceError::InvalidValue { .. }));
        prop_assert!(is_invalid_value);
    }

    #[test]
    fn results_respect_precision(item in arb_item()) {
        let mut item = item;
        item.calculate(2).unwrap();
        for value in [item.subtotal, item.discount_amount, item.total, item.tax_amount] {
            let value = value.unwrap();
            prop_assert_eq!(value, round_half_up(value, 2));
        }
    }
}

// ── Invoice totals ──────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn totals_identities(
        items in arb_items(),
        discount in arb_discount(),
        tax in arb_tax_rate(),
        shipping in arb_shipping(),
    ) {
        let inv = build(items, discount, tax, shipping);
        let t = &inv.totals;

        let sum_totals: Decimal = inv.items.iter().map(|i| i.total.unwrap()).sum();
        let sum_taxes: Decimal = inv.items.iter().map(|i| i.tax_amount.unwrap()).sum();
        prop_assert_eq!(t.items_subtotal, sum_totals);
        prop_assert_eq!(t.items_tax, sum_taxes);
        prop_assert_eq!(t.shipping, shipping);
        prop_assert_eq!(t.taxable_amount, t.items_subtotal - t.invoice_discount + shipping);
        prop_assert_eq!(t.total_tax, t.items_tax + t.invoice_tax);
        prop_assert_eq!(t.total_amount, t.taxable_amount + t.total_tax);
        prop_assert!(t.invoice_discount <= t.items_subtotal);
        prop_assert!(t.total_amount >= Decimal::ZERO);
    }

    #[test]
    fn item_order_does_not_change_totals(
        items in arb_items(),
        discount in arb_discount(),
        tax in arb_tax_rate(),
        shipping in arb_shipping(),
        rotate in 0usize..8,
    ) {
        let mut reordered = items.clone();
        reordered.reverse();
        let len = reordered.len();
        reordered.rotate_left(rotate % len);

        let a = build(items, discount, tax, shipping);
        let b = build(reordered, discount, tax, shipping);
        prop_assert_eq!(a.totals, b.totals);
    }

    #[test]
    fn finalize_is_idempotent(items in arb_items(), discount in arb_discount(), tax in arb_tax_rate()) {
        let mut builder = InvoiceBuilder::new().buyer(buyer()).add_items(items);
        if let Some(Discount::Percentage(p)) = discount {
            builder = builder.discount_by_percent(p);
        }
        if let Some(rate) = tax {
            builder = builder.tax_rate(rate);
        }
        let first = builder.finalize().unwrap();
        let second = builder.finalize().unwrap();
        prop_assert_eq!(first.totals, second.totals);
        prop_assert_eq!(first.items, second.items);
    }
}

// ── Formatters ──────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn money_format_parses_back(cents in -1_000_000_000i64..1_000_000_000i64) {
        let value = Decimal::new(cents, 2);
        let fmt = CurrencyFormat {
            thousands_separator: ",".into(),
            template: "{VALUE}".into(),
            ..CurrencyFormat::default()
        };
        let formatted = fmt.format(value);
        let parsed: Decimal = formatted.replace(',', "").parse().unwrap();
        prop_assert_eq!(parsed, value);
        prop_assert_eq!(formatted.split('.').nth(1).map(str::len), Some(2));
    }

    #[test]
    fn serial_number_never_truncates(seq in 0u64..u64::MAX, padding in 0usize..12) {
        let formatted = format_serial_number("S", "-", seq, padding, "{SERIES}{DELIMITER}{SEQUENCE}");
        let digits = &formatted[2..];
        prop_assert_eq!(digits.parse::<u64>().unwrap(), seq);
        prop_assert!(digits.len() >= padding);
        prop_assert_eq!(digits.len(), padding.max(seq.to_string().len()));
    }
}
