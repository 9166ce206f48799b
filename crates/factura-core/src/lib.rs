//! Core library for simple PDF invoice import.
//!
//! This crate provides:
//! - PDF text extraction (whole-document, first-page, and space-stripped
//!   variants)
//! - Vendor matching by keyword / VAT substring search over a partner
//!   registry
//! - Rule-based field extraction (dates, amounts, invoice number,
//!   description) driven by per-vendor configuration

pub mod error;
pub mod import;
pub mod models;
pub mod pdf;
pub mod text;

pub use error::{FacturaError, ImportError, PdfError, RegistryError, Result};
pub use import::{ImportOptions, SimplePdfParser};
pub use models::config::ImportConfig;
pub use models::parsed::ParsedInvoice;
pub use models::partner::{
    DateFormat, ExtractRule, FieldConfig, FieldName, PageScope, Partner, PartnerRegistry,
};
pub use pdf::{PdfExtractor, PdfTextSource};
pub use text::{strip_spaces, DocumentText};
