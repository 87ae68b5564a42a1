use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::error::InvoiceError;

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";
pub const DEFAULT_PAY_UNTIL_DAYS: u32 = 7;

/// Issue date, display format and payment term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSettings {
    pub date: NaiveDate,
    /// `chrono` strftime pattern.
    pub format: String,
    /// Days between issue date and due date.
    pub pay_until_days: u32,
}

impl Default for DateSettings {
    /// Issued today (local clock), due in a week.
    fn default() -> Self {
        Self {
            date: Local::now().date_naive(),
            format: DEFAULT_DATE_FORMAT.to_string(),
            pay_until_days: DEFAULT_PAY_UNTIL_DAYS,
        }
    }
}

impl DateSettings {
    pub fn due_date(&self) -> NaiveDate {
        self.date
            .checked_add_days(Days::new(u64::from(self.pay_until_days)))
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn formatted_date(&self) -> String {
        format_date(self.date, &self.format)
    }

    pub fn formatted_due_date(&self) -> String {
        format_date(self.due_date(), &self.format)
    }

    /// Reject strftime patterns chrono cannot render.
    pub fn validate(&self) -> Result<(), InvoiceError> {
        if StrftimeItems::new(&self.format).any(|item| matches!(item, Item::Error)) {
            return Err(InvoiceError::invalid(
                "date.format",
                format!("'{}' is not a valid strftime pattern", self.format),
            ));
        }
        Ok(())
    }
}

/// Falls back to ISO format when the pattern cannot be rendered.
fn format_date(date: NaiveDate, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(pattern)).is_err() {
        out.clear();
        let _ = write!(out, "{}", date.format(DEFAULT_DATE_FORMAT));
    }
    out
}
