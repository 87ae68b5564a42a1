//! Rendering seam.
//!
//! The crate does not ship a template engine or a PDF engine. Callers plug
//! theirs in through [`TemplateRenderer`] and [`PdfRenderer`]; an
//! [`InvoiceDocument`] drives them once and caches the PDF bytes for
//! [`stream`](InvoiceDocument::stream), [`download`](InvoiceDocument::download)
//! and [`save`](InvoiceDocument::save).

mod context;
mod document;

pub use context::{InvoiceContext, ItemRow, TotalsContext};
pub use document::{InvoiceDocument, PdfResponse};

use serde_json::{Map, Value};

use crate::core::{PaperOptions, RenderError};

/// Turns a template identifier and an invoice context into HTML.
pub trait TemplateRenderer {
    fn render_html(&self, template: &str, context: &InvoiceContext) -> Result<String, RenderError>;
}

/// Turns HTML into PDF bytes.
pub trait PdfRenderer {
    fn render_pdf(
        &self,
        html: &str,
        paper: &PaperOptions,
        options: &Map<String, Value>,
    ) -> Result<Vec<u8>, RenderError>;
}

/// Destination for saved documents.
pub trait FileSink {
    /// Store `bytes` as `filename` on `disk`.
    fn put(&mut self, disk: &str, filename: &str, bytes: &[u8]) -> Result<(), RenderError>;
}

impl<F> TemplateRenderer for F
where
    F: Fn(&str, &InvoiceContext) -> Result<String, RenderError>,
{
    fn render_html(&self, template: &str, context: &InvoiceContext) -> Result<String, RenderError> {
        self(template, context)
    }
}
