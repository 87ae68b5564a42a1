use std::collections::BTreeMap;

use chrono::NaiveDate;
use invoicer::config::JsonConfig;
use invoicer::core::*;
use invoicer::render::*;
use rust_decimal_macros::dec;
use serde_json::{Map, Value, json};

/// Stand-in for a real HTML-to-PDF engine.
struct EchoPdf;

impl PdfRenderer for EchoPdf {
    fn render_pdf(
        &self,
        html: &str,
        paper: &PaperOptions,
        _options: &Map<String, Value>,
    ) -> Result<Vec<u8>, RenderError> {
        let mut bytes = format!("%PDF-1.7 {} {}\n", paper.size, paper.orientation.as_str()).into_bytes();
        bytes.extend_from_slice(html.as_bytes());
        Ok(bytes)
    }
}

/// Keeps saved files in memory, keyed by disk and filename.
#[derive(Default)]
struct MemoryDisks(BTreeMap<(String, String), Vec<u8>>);

impl FileSink for MemoryDisks {
    fn put(&mut self, disk: &str, filename: &str, bytes: &[u8]) -> Result<(), RenderError> {
        self.0
            .insert((disk.to_string(), filename.to_string()), bytes.to_vec());
        Ok(())
    }
}

fn main() -> Result<(), InvoiceError> {
    let config = JsonConfig::new(json!({
        "invoices": {
            "serial_number": { "series": "WEB", "sequence_padding": 4 },
            "currency": { "code": "usd", "symbol": "$", "format": "{SYMBOL}{VALUE}", "thousands_separator": "," },
            "paper": { "size": "letter" },
            "disk": "archive",
            "seller": { "attributes": { "name": "Webshop Inc.", "address": "1 Market St, San Francisco" } }
        }
    }));

    let invoice = InvoiceBuilder::with_config(&config)
        .buyer(PartyBuilder::buyer("Jane Doe").build())
        .sequence(17)
        .date(NaiveDate::from_ymd_opt(2024, 11, 29).unwrap())
        .add_item(
            InvoiceItemBuilder::new("Mechanical keyboard")
                .price_per_unit(dec!(149.00))
                .discount_by_amount(dec!(20))
                .build(),
        )
        .add_item(
            InvoiceItemBuilder::new("USB-C cable")
                .quantity(dec!(3))
                .price_per_unit(dec!(9.99))
                .build(),
        )
        .tax_rate(dec!(8.625))
        .shipping(dec!(12))
        .finalize()?;

    let templates = |template: &str, ctx: &InvoiceContext| -> Result<String, RenderError> {
        let rows: String = ctx
            .items
            .iter()
            .map(|row| format!("<tr><td>{}</td><td>{}</td></tr>", row.title, row.total))
            .collect();
        Ok(format!(
            "<!-- {template} --><h1>{} {}</h1><table>{rows}</table><p>Total {}</p>",
            ctx.name, ctx.serial_number, ctx.totals.total_amount
        ))
    };

    let mut document = InvoiceDocument::new(invoice);
    println!(
        "{}",
        serde_json::to_string_pretty(&document.context()).unwrap_or_default()
    );

    let response = document.download(&templates, &EchoPdf)?;
    for (name, value) in &response.headers {
        println!("{name}: {value}");
    }

    let mut disks = MemoryDisks::default();
    document.save(&templates, &EchoPdf, &mut disks)?;
    for (disk, filename) in disks.0.keys() {
        println!("saved {disk}:{filename}");
    }
    Ok(())
}
