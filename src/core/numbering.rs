use serde::{Deserialize, Serialize};

use super::error::InvoiceError;

/// Serial number configuration.
///
/// Rendered through a template with `{SERIES}`, `{DELIMITER}` and
/// `{SEQUENCE}` placeholders; the sequence is zero-padded to `padding`
/// digits and never truncated.
///
/// ```
/// use invoicer::core::SerialNumber;
///
/// let serial = SerialNumber::new("TEST", 123).with_padding(5);
/// assert_eq!(serial.format(), "TEST.00123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialNumber {
    pub series: String,
    pub delimiter: String,
    pub sequence: u64,
    /// Minimum digit count of the sequence.
    pub padding: usize,
    pub template: String,
}

impl Default for SerialNumber {
    fn default() -> Self {
        Self {
            series: "AA".to_string(),
            delimiter: ".".to_string(),
            sequence: 1,
            padding: 5,
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

pub const DEFAULT_TEMPLATE: &str = "{SERIES}{DELIMITER}{SEQUENCE}";

/// Widest accepted padding: the digit count of `u64::MAX`.
pub const MAX_PADDING: usize = 20;

impl SerialNumber {
    /// Serial number with default delimiter, padding and template.
    pub fn new(series: impl Into<String>, sequence: u64) -> Self {
        Self {
            series: series.into(),
            sequence,
            ..Self::default()
        }
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    pub fn with_padding(mut self, width: usize) -> Self {
        self.padding = width;
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// The composed identifier.
    pub fn format(&self) -> String {
        format_serial_number(
            &self.series,
            &self.delimiter,
            self.sequence,
            self.padding,
            &self.template,
        )
    }

    /// Reject a padding wider than [`MAX_PADDING`].
    pub fn validate(&self) -> Result<(), InvoiceError> {
        if self.padding > MAX_PADDING {
            return Err(InvoiceError::invalid(
                "serial_number.padding",
                format!("must be at most {MAX_PADDING}, got {}", self.padding),
            ));
        }
        Ok(())
    }

    /// Zero-padded sequence on its own.
    pub fn padded_sequence(&self) -> String {
        pad_sequence(self.sequence, self.padding)
    }
}

/// Compose a serial number from its parts.
///
/// Placeholders are expanded in one pass, so placeholder text inside the
/// series or delimiter is kept literally. Padding is clamped to [`MAX_PADDING`].
pub fn format_serial_number(
    series: &str,
    delimiter: &str,
    sequence: u64,
    padding: usize,
    template: &str,
) -> String {
    let sequence = pad_sequence(sequence, padding);
    let mut out = String::with_capacity(template.len() + series.len() + sequence.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let expansion = [
            ("{SERIES}", series),
            ("{DELIMITER}", delimiter),
            ("{SEQUENCE}", sequence.as_str()),
        ]
        .into_iter()
        .find(|(placeholder, _)| tail.starts_with(placeholder));
        match expansion {
            Some((placeholder, value)) => {
                out.push_str(value);
                rest = &tail[placeholder.len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn pad_sequence(sequence: u64, padding: usize) -> String {
    format!("{:0>width$}", sequence, width = padding.min(MAX_PADDING))
}

/// Issues consecutive serial numbers from one series.
///
/// Every issued number shares the series, delimiter, padding and template of
/// the prototype it was created from.
#[derive(Debug, Clone)]
pub struct SerialNumberSequence {
    prototype: SerialNumber,
    next_sequence: u64,
}

impl SerialNumberSequence {
    /// Start a sequence at 1.
    pub fn new(series: impl Into<String>) -> Self {
        Self::starting_at(SerialNumber::new(series, 1))
    }

    /// Continue from the sequence number of `prototype`.
    pub fn starting_at(prototype: SerialNumber) -> Self {
        Self {
            next_sequence: prototype.sequence,
            prototype,
        }
    }

    /// Issue the next serial number.
    pub fn next_serial(&mut self) -> SerialNumber {
        let serial = self.peek();
        self.next_sequence += 1;
        serial
    }

    /// Preview the next serial number without consuming it.
    pub fn peek(&self) -> SerialNumber {
        SerialNumber {
            sequence: self.next_sequence,
            ..self.prototype.clone()
        }
    }

    /// The next sequence number that will be issued.
    pub fn next_raw(&self) -> u64 {
        self.next_sequence
    }
}
