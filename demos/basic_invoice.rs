use chrono::NaiveDate;
use invoicer::core::*;
use rust_decimal_macros::dec;

fn main() {
    // A consulting invoice with an item discount, mixed taxes and shipping
    let invoice = InvoiceBuilder::new()
        .name("Consulting March")
        .seller(
            PartyBuilder::seller("ACME GmbH")
                .address("Friedrichstraße 123, 10115 Berlin")
                .vat("DE123456789")
                .phone("+49 30 12345")
                .build(),
        )
        .buyer(
            PartyBuilder::buyer("Kunde AG")
                .address("Marienplatz 1, 80331 München")
                .code("K-1001")
                .custom_field("order number", "PO-77")
                .build(),
        )
        .series("RE")
        .sequence(2024)
        .delimiter("-")
        .date(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap())
        .date_format("%d.%m.%Y")
        .pay_until_days(30)
        .currency_thousands_separator(".")
        .currency_decimal_point(",")
        .add_item(
            InvoiceItemBuilder::new("Softwareentwicklung")
                .description("React Frontend Entwicklung")
                .units("h")
                .quantity(dec!(80))
                .price_per_unit(dec!(120))
                .discount_by_percent(dec!(5))
                .build(),
        )
        .add_item(
            InvoiceItemBuilder::new("Hosting (monatlich)")
                .price_per_unit(dec!(49.90))
                .build(),
        )
        .tax_rate(dec!(19))
        .shipping(dec!(4.90))
        .notes("Zahlbar innerhalb von 30 Tagen ohne Abzug")
        .finalize()
        .expect("invoice should be valid");

    let totals = &invoice.totals;
    println!("Invoice: {}", invoice.serial_number());
    println!("Date:    {}", invoice.formatted_date());
    println!("Due:     {}", invoice.formatted_due_date());
    println!("Seller:  {}", invoice.seller.name);
    println!("Buyer:   {}", invoice.buyer.name);
    println!("---");
    for item in &invoice.items {
        println!(
            "  {} x {} @ {} = {}",
            item.quantity,
            item.title,
            invoice.format_currency(item.price_per_unit),
            invoice.format_currency(item.total.unwrap_or_default())
        );
    }
    println!("---");
    println!("Subtotal: {}", invoice.format_currency(totals.items_subtotal));
    println!("Discount: {}", invoice.format_currency(totals.total_discount()));
    println!("Shipping: {}", invoice.format_currency(totals.shipping));
    println!("Tax:      {}", invoice.format_currency(totals.total_tax));
    println!("Total:    {}", invoice.format_currency(totals.total_amount));
    println!("File:     {}", invoice.filename);
}
