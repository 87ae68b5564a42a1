#![no_main]

use libfuzzer_sys::fuzz_target;
use rust_decimal::Decimal;

use invoicer::core::format_decimal;

fuzz_target!(|data: &[u8]| {
    let Some((&decimals, rest)) = data.split_first() else {
        return;
    };
    if let Ok(s) = std::str::from_utf8(rest) {
        if let Ok(value) = s.parse::<Decimal>() {
            let _ = format_decimal(value, u32::from(decimals % 29), ",", ".");
        }
    }
});
