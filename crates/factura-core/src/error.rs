//! Error types for the factura-core library.

use thiserror::Error;

use crate::models::partner::FieldName;

/// Main error type for the factura library.
#[derive(Error, Debug)]
pub enum FacturaError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Invoice import error.
    #[error("import error: {0}")]
    Import(#[from] ImportError),

    /// Partner registry error.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors raised by the import pipeline.
///
/// Per-field extraction failures are not errors: they are collected on the
/// result as failed fields and reported in a single summary message.
#[derive(Error, Debug)]
pub enum ImportError {
    /// No registry candidate matched the document text.
    #[error("vendor not found")]
    VendorNotFound,

    /// The document yielded no usable text.
    #[error("no text could be extracted from the document")]
    EmptyDocument,

    /// A field configuration cannot be applied at run time.
    #[error("invalid configuration for {field}: {reason}")]
    InvalidFieldConfig { field: FieldName, reason: String },
}

/// Errors related to the partner registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Failed to read the registry file.
    #[error("failed to read registry: {0}")]
    Read(#[from] std::io::Error),

    /// Failed to deserialize the registry.
    #[error("failed to parse registry: {0}")]
    Parse(#[from] serde_json::Error),

    /// A partner record is malformed.
    #[error("invalid partner {partner}: {reason}")]
    InvalidPartner { partner: String, reason: String },
}

/// Result type for the factura library.
pub type Result<T> = std::result::Result<T, FacturaError>;
