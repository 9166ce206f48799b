//! PDF processing module.

mod extractor;

pub use extractor::PdfExtractor;

use crate::error::PdfError;
use crate::text::DocumentText;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF text extraction implementations.
pub trait PdfTextSource {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Extract text from the entire PDF.
    fn extract_text(&self) -> Result<String>;

    /// Extract text from a specific page (1-indexed).
    fn extract_page_text(&self, page: u32) -> Result<String>;

    /// Extract the text variants the import pipeline consumes.
    fn extract_document_text(&self) -> Result<DocumentText> {
        let all = self.extract_text()?;
        if self.page_count() <= 1 {
            return Ok(DocumentText::single_page(all));
        }
        let first = self.extract_page_text(1)?;
        Ok(DocumentText::new(all, first))
    }
}
