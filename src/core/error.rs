use thiserror::Error;

/// Errors that can occur while building, calculating or rendering an invoice.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InvoiceError {
    /// An input value is out of range or malformed.
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        /// Path to the offending field (e.g. "items[1].quantity").
        field: String,
        /// Human-readable error description.
        message: String,
    },

    /// A configuration document lacks a required section.
    #[error("configuration missing: {0}")]
    ConfigurationMissing(String),

    /// A configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Builder encountered invalid or missing input.
    #[error("builder error: {0}")]
    Builder(String),

    /// Template, PDF engine or file sink failure, passed through unchanged.
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl InvoiceError {
    /// Create an `InvalidValue` error for `field`.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Prefix the field path of an `InvalidValue` error.
    ///
    /// Other variants are returned untouched.
    pub fn within(self, prefix: &str) -> Self {
        match self {
            Self::InvalidValue { field, message } => Self::InvalidValue {
                field: format!("{prefix}.{field}"),
                message,
            },
            other => other,
        }
    }
}

/// Opaque error produced by an external renderer or file sink.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct RenderError(Box<dyn std::error::Error + Send + Sync>);

impl RenderError {
    /// Wrap any error coming out of a renderer implementation.
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(source.into())
    }

    /// Borrow the wrapped error.
    pub fn inner(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.0.as_ref()
    }
}
