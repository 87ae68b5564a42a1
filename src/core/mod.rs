//! Core invoice types, calculation and formatting.
//!
//! Line items and invoice totals are computed with [`rust_decimal::Decimal`]
//! and commercial rounding; money, serial numbers and dates are formatted
//! by small, independent modules that [`Invoice`] delegates to.

mod builder;
mod calculation;
mod currencies;
mod dates;
mod error;
mod money;
mod numbering;
mod types;

pub use builder::*;
pub use calculation::*;
pub use currencies::{Currency, currency, is_known_currency_code};
pub use dates::*;
pub use error::*;
pub use money::*;
pub use numbering::*;
pub use types::*;
