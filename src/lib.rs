//! # invoicer
//!
//! Invoice documents with exact totals, display formatting and pluggable
//! HTML/PDF rendering.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//! Totals are computed once, by [`InvoiceBuilder::finalize`](core::InvoiceBuilder::finalize);
//! the finalized [`Invoice`](core::Invoice) is plain data.
//!
//! ## Quick Start
//!
//! ```rust
//! use invoicer::core::*;
//! use rust_decimal_macros::dec;
//!
//! let invoice = InvoiceBuilder::new()
//!     .series("TEST")
//!     .sequence(123)
//!     .buyer(PartyBuilder::buyer("John Doe").custom_field("email", "john@example.com").build())
//!     .add_item(InvoiceItemBuilder::new("Test Service")
//!         .price_per_unit(dec!(100))
//!         .quantity(dec!(2))
//!         .discount_by_percent(dec!(10))
//!         .build())
//!     .finalize()
//!     .unwrap();
//!
//! assert_eq!(invoice.serial_number(), "TEST.00123");
//! assert_eq!(invoice.items[0].discount_amount, Some(dec!(20)));
//! assert_eq!(invoice.totals.total_amount, dec!(180));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Invoice types, calculation, money/serial/date formatting, configuration |
//! | `render` | Template/PDF renderer traits, cached rendering, stream/download/save |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "core")]
pub mod config;

#[cfg(feature = "render")]
pub mod render;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
