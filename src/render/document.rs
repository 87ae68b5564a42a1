use super::{FileSink, InvoiceContext, PdfRenderer, TemplateRenderer};
use crate::core::{Invoice, InvoiceError};

/// A finalized invoice together with its rendered PDF.
///
/// The PDF is produced on the first successful [`render`](Self::render) and
/// cached; later calls return the cached bytes without invoking any renderer.
#[derive(Debug, Clone)]
pub struct InvoiceDocument {
    invoice: Invoice,
    output: Option<Vec<u8>>,
}

/// PDF bytes with the HTTP status and headers to serve them with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl PdfResponse {
    /// First header with `name`, compared case insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl InvoiceDocument {
    pub fn new(invoice: Invoice) -> Self {
        Self {
            invoice,
            output: None,
        }
    }

    pub fn invoice(&self) -> &Invoice {
        &self.invoice
    }

    pub fn into_invoice(self) -> Invoice {
        self.invoice
    }

    /// Cached PDF bytes, if rendered.
    pub fn output(&self) -> Option<&[u8]> {
        self.output.as_deref()
    }

    pub fn context(&self) -> InvoiceContext {
        InvoiceContext::from_invoice(&self.invoice)
    }

    /// Render the HTML only. Not cached.
    pub fn to_html<T>(&self, templates: &T) -> Result<String, InvoiceError>
    where
        T: TemplateRenderer + ?Sized,
    {
        Ok(templates.render_html(&self.invoice.template, &self.context())?)
    }

    /// Render the PDF, or return the cached bytes.
    pub fn render<T, P>(&mut self, templates: &T, pdf: &P) -> Result<&[u8], InvoiceError>
    where
        T: TemplateRenderer + ?Sized,
        P: PdfRenderer + ?Sized,
    {
        let bytes = match self.output.take() {
            Some(bytes) => {
                tracing::debug!(filename = %self.invoice.filename, "using cached PDF");
                bytes
            }
            None => {
                let html = self.to_html(templates)?;
                let bytes =
                    pdf.render_pdf(&html, &self.invoice.paper, &self.invoice.pdf_options)?;
                tracing::debug!(
                    filename = %self.invoice.filename,
                    template = %self.invoice.template,
                    size = bytes.len(),
                    "invoice rendered"
                );
                bytes
            }
        };
        Ok(self.output.insert(bytes).as_slice())
    }

    /// Response that displays the PDF inline.
    pub fn stream<T, P>(&mut self, templates: &T, pdf: &P) -> Result<PdfResponse, InvoiceError>
    where
        T: TemplateRenderer + ?Sized,
        P: PdfRenderer + ?Sized,
    {
        let body = self.render(templates, pdf)?.to_vec();
        Ok(PdfResponse {
            status: 200,
            headers: vec![
                ("Content-Type".into(), "application/pdf".into()),
                ("Content-Disposition".into(), self.disposition("inline")),
            ],
            body,
        })
    }

    /// Response that makes the browser save the PDF.
    pub fn download<T, P>(&mut self, templates: &T, pdf: &P) -> Result<PdfResponse, InvoiceError>
    where
        T: TemplateRenderer + ?Sized,
        P: PdfRenderer + ?Sized,
    {
        let body = self.render(templates, pdf)?.to_vec();
        Ok(PdfResponse {
            status: 200,
            headers: vec![
                ("Content-Type".into(), "application/pdf".into()),
                ("Content-Disposition".into(), self.disposition("attachment")),
                ("Content-Length".into(), body.len().to_string()),
            ],
            body,
        })
    }

    /// Render if needed and write the PDF to `sink` under the invoice's disk and filename.
    pub fn save<T, P, S>(&mut self, templates: &T, pdf: &P, sink: &mut S) -> Result<(), InvoiceError>
    where
        T: TemplateRenderer + ?Sized,
        P: PdfRenderer + ?Sized,
        S: FileSink + ?Sized,
    {
        self.render(templates, pdf)?;
        let bytes = self.output.as_deref().unwrap_or_default();
        sink.put(&self.invoice.disk, &self.invoice.filename, bytes)?;
        tracing::debug!(disk = %self.invoice.disk, filename = %self.invoice.filename, "invoice saved");
        Ok(())
    }

    fn disposition(&self, kind: &str) -> String {
        let mut escaped = String::with_capacity(self.invoice.filename.len() + 2);
        for ch in self.invoice.filename.chars().filter(|c| !c.is_control()) {
            if matches!(ch, '\\' | '"') {
                escaped.push('\\');
            }
            escaped.push(ch);
        }
        format!("{kind}; filename=\"{escaped}\"")
    }
}
