//! The import pipeline: text extraction, vendor matching, field dispatch.

use tracing::{debug, info, warn};

use crate::error::{ImportError, Result};
use crate::models::config::ImportConfig;
use crate::models::parsed::ParsedInvoice;
use crate::models::partner::{FieldKind, PageScope, PartnerRegistry};
use crate::pdf::{PdfExtractor, PdfTextSource};
use crate::text::DocumentText;

use super::matcher::match_partner;
use super::rules::{extract_amount, extract_date, extract_description, extract_invoice_number};

/// Options for one import run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    /// Report how the vendor was matched in the result messages.
    pub test_mode: bool,
}

/// Rule-driven invoice parser over a partner registry.
///
/// The registry and configuration are read-only during a run; the parser can
/// be reused across documents.
pub struct SimplePdfParser {
    registry: PartnerRegistry,
    config: ImportConfig,
}

impl SimplePdfParser {
    /// Create a parser over a registry with default configuration.
    pub fn new(registry: PartnerRegistry) -> Self {
        Self {
            registry,
            config: ImportConfig::default(),
        }
    }

    /// Replace the pipeline configuration.
    pub fn with_config(mut self, config: ImportConfig) -> Self {
        self.config = config;
        self
    }

    /// The registry this parser matches against.
    pub fn registry(&self) -> &PartnerRegistry {
        &self.registry
    }

    /// Parse one invoice document from raw PDF bytes.
    pub fn parse(&self, file_data: &[u8]) -> Result<ParsedInvoice> {
        self.parse_with_options(file_data, ImportOptions::default())
    }

    /// Parse one invoice document from raw PDF bytes, with options.
    pub fn parse_with_options(
        &self,
        file_data: &[u8],
        options: ImportOptions,
    ) -> Result<ParsedInvoice> {
        info!("Trying to analyze PDF invoice ({} bytes)", file_data.len());

        let mut extractor = PdfExtractor::new();
        extractor.load(file_data)?;
        let text = extractor.extract_document_text()?;

        if text.all.trim().is_empty() {
            return Err(ImportError::EmptyDocument.into());
        }
        if text.all.trim().len() < self.config.pdf.min_text_length {
            warn!(
                "Document text is only {} characters; likely a scan without a text layer",
                text.all.trim().len()
            );
        }

        self.parse_text(&text, options)
    }

    /// Parse an invoice from already-extracted document text.
    pub fn parse_text(&self, text: &DocumentText, options: ImportOptions) -> Result<ParsedInvoice> {
        let matched = match_partner(&self.registry, &text.all_no_space)
            .ok_or(ImportError::VendorNotFound)?;
        let partner = matched.partner;

        info!("Found partner '{}' (id {})", partner.name, partner.id);

        let mut parsed = ParsedInvoice {
            partner_id: partner.id,
            partner_name: partner.name.clone(),
            currency: partner
                .currency
                .clone()
                .or_else(|| Some(self.config.extraction.default_currency.clone())),
            ..ParsedInvoice::default()
        };

        if options.test_mode {
            parsed.messages.push(matched.report());
        }

        let raw_text = match partner.pages {
            PageScope::First => &text.first,
            PageScope::All => &text.all,
        };

        for field in &partner.fields {
            debug!("Working on field {:?}", field.name);
            let extracted = match field.name.kind() {
                FieldKind::Date => match extract_date(raw_text, field)? {
                    Some(value) => {
                        parsed.set_date(field.name, value);
                        true
                    }
                    None => false,
                },
                FieldKind::Amount => match extract_amount(raw_text, field)? {
                    Some(value) => {
                        parsed.set_amount(field.name, value);
                        true
                    }
                    None => false,
                },
                FieldKind::InvoiceNumber => match extract_invoice_number(raw_text, field)? {
                    Some(value) => {
                        parsed.invoice_number = Some(value);
                        true
                    }
                    None => false,
                },
                FieldKind::Description => match extract_description(raw_text, field)? {
                    Some(value) => {
                        parsed.description = Some(value);
                        true
                    }
                    None => false,
                },
            };

            if !extracted {
                debug!("No value for field {:?}", field.name);
                parsed.failed_fields.push(field.name);
            }
        }

        if !parsed.failed_fields.is_empty() {
            let labels: Vec<String> = parsed
                .failed_fields
                .iter()
                .map(|f| format!("<b>{}</b>", f.label()))
                .collect();
            parsed.messages.push(format!(
                "<b>Failed</b> to extract the following field(s): {}.",
                labels.join(", ")
            ));
        }

        debug!("Parsed invoice: {:?}", parsed);
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    use super::*;
    use crate::error::FacturaError;
    use crate::models::partner::{
        DateFormat, ExtractRule, FieldConfig, FieldName, PageScope, Partner,
    };

    fn vendor() -> Partner {
        Partner {
            id: 7,
            name: "Acme SARL".to_string(),
            vat: None,
            keywords: Some("Acme|SARL".to_string()),
            is_company: true,
            parent_id: None,
            pages: PageScope::All,
            currency: Some("EUR".to_string()),
            fields: vec![
                FieldConfig {
                    date_format: Some(DateFormat::DdMmY4),
                    ..FieldConfig::new(FieldName::Date)
                },
                FieldConfig {
                    extract_rule: ExtractRule::Max,
                    ..FieldConfig::new(FieldName::AmountTotal)
                },
                FieldConfig::new(FieldName::InvoiceNumber),
            ],
        }
    }

    fn registry() -> PartnerRegistry {
        PartnerRegistry {
            company_partner_id: None,
            partners: vec![vendor()],
        }
    }

    const INVOICE_TEXT: &str = "\
Acme S A R L
Invoice no FA-2024-010
Date: 15.03.2024
Untaxed: 100,00
VAT: 20,00
Total: 120,00
";

    #[test]
    fn test_parse_text_happy_path() {
        let parser = SimplePdfParser::new(registry());
        let text = DocumentText::single_page(INVOICE_TEXT.to_string());
        let parsed = parser.parse_text(&text, ImportOptions::default()).unwrap();

        assert_eq!(parsed.partner_id, 7);
        assert_eq!(parsed.partner_name, "Acme SARL");
        assert_eq!(parsed.currency, Some("EUR".to_string()));
        assert_eq!(parsed.invoice_number, Some("FA-2024-010".to_string()));
        assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(parsed.amount_total, Some(Decimal::from_str("120.00").unwrap()));
        assert!(parsed.failed_fields.is_empty());
        assert!(parsed.messages.is_empty());
    }

    #[test]
    fn test_vendor_not_found_is_hard_stop() {
        let parser = SimplePdfParser::new(registry());
        let text = DocumentText::single_page("Unrelated document".to_string());
        let err = parser.parse_text(&text, ImportOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            FacturaError::Import(ImportError::VendorNotFound)
        ));
    }

    #[test]
    fn test_failed_fields_are_soft_and_labeled() {
        let mut reg = registry();
        reg.partners[0].fields.push(FieldConfig {
            date_format: Some(DateFormat::DdMmY4),
            ..FieldConfig::new(FieldName::DateDue)
        });

        let parser = SimplePdfParser::new(reg);
        let text = DocumentText::single_page(
            "Acme SARL\nInvoice no FA-1\nTotal: 10,00".to_string(),
        );
        let parsed = parser.parse_text(&text, ImportOptions::default()).unwrap();

        // Both date fields fail: there is no date in the text.
        assert_eq!(
            parsed.failed_fields,
            vec![FieldName::Date, FieldName::DateDue]
        );
        assert_eq!(parsed.messages.len(), 1);
        assert_eq!(
            parsed.messages[0],
            "<b>Failed</b> to extract the following field(s): \
             <b>Invoice Date</b>, <b>Due Date</b>."
        );
        // The rest of the import still succeeded.
        assert_eq!(parsed.invoice_number, Some("FA-1".to_string()));
    }

    #[test]
    fn test_test_mode_reports_match() {
        let parser = SimplePdfParser::new(registry());
        let text = DocumentText::single_page(INVOICE_TEXT.to_string());
        let parsed = parser
            .parse_text(&text, ImportOptions { test_mode: true })
            .unwrap();
        assert_eq!(
            parsed.messages,
            vec!["<li>Successful match on 2 keyword(s) (Acme, SARL)</li>".to_string()]
        );
    }

    #[test]
    fn test_first_page_scope() {
        let mut reg = registry();
        reg.partners[0].pages = PageScope::First;

        let parser = SimplePdfParser::new(reg);
        // The amount only exists on the second page.
        let text = DocumentText::new(
            "Acme SARL page one\n\nTotal: 99,00".to_string(),
            "Acme SARL page one".to_string(),
        );
        let parsed = parser.parse_text(&text, ImportOptions::default()).unwrap();

        assert!(parsed.amount_total.is_none());
        assert!(parsed.failed_fields.contains(&FieldName::AmountTotal));
    }

    #[test]
    fn test_default_currency_from_config() {
        let mut reg = registry();
        reg.partners[0].currency = None;

        let parser = SimplePdfParser::new(reg);
        let text = DocumentText::single_page(INVOICE_TEXT.to_string());
        let parsed = parser.parse_text(&text, ImportOptions::default()).unwrap();
        assert_eq!(parsed.currency, Some("EUR".to_string()));
    }

    #[test]
    fn test_invalid_field_config_propagates() {
        let mut reg = registry();
        reg.partners[0].fields.push(FieldConfig {
            pattern: Some("([".to_string()),
            ..FieldConfig::new(FieldName::Description)
        });

        let parser = SimplePdfParser::new(reg);
        let text = DocumentText::single_page(INVOICE_TEXT.to_string());
        assert!(parser.parse_text(&text, ImportOptions::default()).is_err());
    }

    #[test]
    fn test_parse_rejects_garbage_bytes() {
        let parser = SimplePdfParser::new(registry());
        assert!(matches!(
            parser.parse(b"not a pdf"),
            Err(FacturaError::Pdf(_))
        ));
    }
}
