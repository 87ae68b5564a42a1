#![no_main]

use libfuzzer_sys::fuzz_target;

use invoicer::config::{InvoiceDefaults, JsonConfig};
use invoicer::core::{InvoiceBuilder, PartyBuilder};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Bad config must surface as an error or fall back, never panic.
        if let Ok(config) = JsonConfig::from_json_str(s) {
            let defaults = InvoiceDefaults::load(&config);
            let _ = InvoiceBuilder::from_defaults(defaults)
                .buyer(PartyBuilder::buyer("Fuzz").build())
                .finalize()
                .map(|invoice| (invoice.serial_number(), invoice.formatted_due_date()));
        }
    }
});
