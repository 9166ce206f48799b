//! Partner (vendor) records and per-field extraction configuration.
//!
//! The registry stands in for the ERP partner table: records are created and
//! edited by administrators and are read-only at extraction time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::RegistryError;

/// Which pages of the document are scanned during field extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageScope {
    /// Only the first page.
    First,
    /// The whole document.
    #[default]
    All,
}

/// The fixed set of extractable invoice fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    /// Invoice date.
    Date,
    /// Payment due date.
    DateDue,
    /// Start date of the invoiced period.
    DateStart,
    /// End date of the invoiced period.
    DateEnd,
    /// Total amount, tax included.
    AmountTotal,
    /// Untaxed amount.
    AmountUntaxed,
    /// Tax amount.
    AmountTax,
    /// Invoice number.
    InvoiceNumber,
    /// Description line.
    Description,
}

/// Extraction routine a field dispatches to, derived from the field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Date,
    Amount,
    InvoiceNumber,
    Description,
}

impl FieldName {
    /// All field names, in configuration-screen order.
    pub const ALL: [FieldName; 9] = [
        FieldName::Date,
        FieldName::DateDue,
        FieldName::DateStart,
        FieldName::DateEnd,
        FieldName::AmountTotal,
        FieldName::AmountUntaxed,
        FieldName::AmountTax,
        FieldName::InvoiceNumber,
        FieldName::Description,
    ];

    /// Routine this field is handled by.
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldName::Date | FieldName::DateDue | FieldName::DateStart | FieldName::DateEnd => {
                FieldKind::Date
            }
            FieldName::AmountTotal | FieldName::AmountUntaxed | FieldName::AmountTax => {
                FieldKind::Amount
            }
            FieldName::InvoiceNumber => FieldKind::InvoiceNumber,
            FieldName::Description => FieldKind::Description,
        }
    }

    /// Human display label, used in user-facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            FieldName::Date => "Invoice Date",
            FieldName::DateDue => "Due Date",
            FieldName::DateStart => "Start Date",
            FieldName::DateEnd => "End Date",
            FieldName::AmountTotal => "Total Amount (tax included)",
            FieldName::AmountUntaxed => "Untaxed Amount",
            FieldName::AmountTax => "Tax Amount",
            FieldName::InvoiceNumber => "Invoice Number",
            FieldName::Description => "Description",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Date format selector for date fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateFormat {
    /// 31-12-2024 (also 31.12.2024, 31/12/2024, 31 12 2024)
    #[serde(rename = "dd-mm-y4")]
    DdMmY4,
    /// 12-31-2024
    #[serde(rename = "mm-dd-y4")]
    MmDdY4,
    /// 2024-12-31
    #[serde(rename = "y4-mm-dd")]
    Y4MmDd,
    /// 31-12-24
    #[serde(rename = "dd-mm-y2")]
    DdMmY2,
    /// 12-31-24
    #[serde(rename = "mm-dd-y2")]
    MmDdY2,
    /// 31 December 2024 / 31 décembre 2024
    #[serde(rename = "dd-month-y4")]
    DdMonthY4,
    /// December 31, 2024
    #[serde(rename = "month-dd-y4")]
    MonthDdY4,
}

impl Default for DateFormat {
    fn default() -> Self {
        Self::DdMmY4
    }
}

/// Rule selecting one value among the candidates a field pattern produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractRule {
    /// First candidate in text order.
    First,
    /// Last candidate in text order.
    Last,
    /// Nth candidate from the start (1-based, `position`).
    PositionStart,
    /// Nth candidate from the end (1-based, `position`).
    PositionEnd,
    /// Smallest value (oldest date / lowest amount).
    Min,
    /// Largest value (newest date / highest amount).
    Max,
}

impl Default for ExtractRule {
    fn default() -> Self {
        Self::First
    }
}

/// Per-partner rule describing how to locate one invoice field's value in
/// extracted text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Which field this rule extracts.
    pub name: FieldName,

    /// Date format, for date fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<DateFormat>,

    /// Candidate selection rule.
    #[serde(default)]
    pub extract_rule: ExtractRule,

    /// 1-based index for the position rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,

    /// Custom regex; candidates come from its first capture group (or the
    /// whole match when there is no group).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Static value, for the description field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_value: Option<String>,
}

impl FieldConfig {
    /// A rule with defaults for everything but the field name.
    pub fn new(name: FieldName) -> Self {
        Self {
            name,
            date_format: None,
            extract_rule: ExtractRule::default(),
            position: None,
            pattern: None,
            fixed_value: None,
        }
    }
}

/// A partner record eligible for invoice-vendor matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partner {
    /// Unique identifier.
    pub id: u32,

    /// Display name.
    pub name: String,

    /// VAT number as printed on this vendor's invoices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat: Option<String>,

    /// Pipe-delimited keywords; the document must contain all of them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,

    /// Company-level record flag.
    #[serde(default = "default_true")]
    pub is_company: bool,

    /// Parent company, for contact records hanging under one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<u32>,

    /// Pages scanned during field extraction.
    #[serde(default)]
    pub pages: PageScope,

    /// ISO currency code for this vendor's invoices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Ordered field extraction configuration.
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
}

fn default_true() -> bool {
    true
}

impl Partner {
    /// Keyword list with ordinary spaces stripped, or `None` when the
    /// keyword string is absent or blank.
    pub fn keyword_list(&self) -> Option<Vec<String>> {
        let raw = self.keywords.as_deref()?;
        if raw.trim().is_empty() {
            return None;
        }
        Some(
            raw.replace(' ', "")
                .split('|')
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }
}

/// The set of partner records the import pipeline matches against.
///
/// `partners` order is the deterministic candidate order: the first matching
/// record wins, ties are not resolved by specificity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartnerRegistry {
    /// The host organization's own partner record, excluded from matching.
    /// Invoices usually carry the customer's VAT number next to the
    /// vendor's, so the company must never match itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_partner_id: Option<u32>,

    /// Partner records, in candidate order.
    #[serde(default)]
    pub partners: Vec<Partner>,
}

impl PartnerRegistry {
    /// Load a registry from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, RegistryError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save the registry to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), RegistryError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Partner records eligible for vendor matching: company-level records
    /// without a parent, excluding the host organization's own record, that
    /// carry a VAT number or a non-blank keyword string.
    pub fn candidates(&self) -> impl Iterator<Item = &Partner> {
        self.partners.iter().filter(|p| {
            p.is_company
                && p.parent_id.is_none()
                && Some(p.id) != self.company_partner_id
                && (p.keyword_list().is_some() || p.vat.is_some())
        })
    }

    /// Look up a partner by id.
    pub fn get(&self, id: u32) -> Option<&Partner> {
        self.partners.iter().find(|p| p.id == id)
    }

    /// Validate the registry and return any issues found.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        let mut seen = std::collections::HashSet::new();
        for partner in &self.partners {
            if !seen.insert(partner.id) {
                issues.push(format!("duplicate partner id {}", partner.id));
            }

            for field in &partner.fields {
                let ctx = format!("partner '{}' field {:?}", partner.name, field.name);

                if matches!(
                    field.extract_rule,
                    ExtractRule::PositionStart | ExtractRule::PositionEnd
                ) && field.position.is_none()
                {
                    issues.push(format!("{ctx}: position rule without a position"));
                }
                if field.position == Some(0) {
                    issues.push(format!("{ctx}: positions are 1-based"));
                }

                match field.name.kind() {
                    FieldKind::Date => {
                        if field.date_format.is_none() {
                            issues.push(format!("{ctx}: date field without a date format"));
                        }
                    }
                    FieldKind::InvoiceNumber | FieldKind::Description => {
                        if matches!(field.extract_rule, ExtractRule::Min | ExtractRule::Max) {
                            issues.push(format!("{ctx}: min/max does not apply to text fields"));
                        }
                        if field.name.kind() == FieldKind::Description
                            && field.pattern.is_none()
                            && field.fixed_value.is_none()
                        {
                            issues.push(format!("{ctx}: needs a pattern or a fixed value"));
                        }
                    }
                    FieldKind::Amount => {}
                }

                if let Some(pattern) = &field.pattern {
                    if let Err(e) = regex::Regex::new(pattern) {
                        issues.push(format!("{ctx}: invalid pattern: {e}"));
                    }
                }
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn partner(id: u32, name: &str) -> Partner {
        Partner {
            id,
            name: name.to_string(),
            vat: None,
            keywords: None,
            is_company: true,
            parent_id: None,
            pages: PageScope::All,
            currency: None,
            fields: Vec::new(),
        }
    }

    #[test]
    fn test_field_name_kind() {
        assert_eq!(FieldName::DateDue.kind(), FieldKind::Date);
        assert_eq!(FieldName::AmountUntaxed.kind(), FieldKind::Amount);
        assert_eq!(FieldName::InvoiceNumber.kind(), FieldKind::InvoiceNumber);
        assert_eq!(FieldName::Description.kind(), FieldKind::Description);
    }

    #[test]
    fn test_field_name_serde() {
        assert_eq!(
            serde_json::to_string(&FieldName::AmountTotal).unwrap(),
            "\"amount_total\""
        );
        let name: FieldName = serde_json::from_str("\"invoice_number\"").unwrap();
        assert_eq!(name, FieldName::InvoiceNumber);
    }

    #[test]
    fn test_date_format_serde() {
        assert_eq!(
            serde_json::to_string(&DateFormat::DdMonthY4).unwrap(),
            "\"dd-month-y4\""
        );
    }

    #[test]
    fn test_keyword_list_strips_spaces() {
        let mut p = partner(1, "Acme");
        p.keywords = Some("Acme Corp | FR 123".to_string());
        assert_eq!(
            p.keyword_list(),
            Some(vec!["AcmeCorp".to_string(), "FR123".to_string()])
        );
    }

    #[test]
    fn test_blank_keywords_is_none() {
        let mut p = partner(1, "Acme");
        p.keywords = Some("   ".to_string());
        assert_eq!(p.keyword_list(), None);
    }

    #[test]
    fn test_candidates_filtering() {
        let mut own = partner(1, "My Company");
        own.vat = Some("FR111".to_string());
        let mut contact = partner(2, "Acme Contact");
        contact.parent_id = Some(3);
        contact.vat = Some("FR222".to_string());
        let mut vendor = partner(3, "Acme");
        vendor.vat = Some("FR222".to_string());
        let no_match_data = partner(4, "No Vat No Keywords");

        let registry = PartnerRegistry {
            company_partner_id: Some(1),
            partners: vec![own, contact, vendor, no_match_data],
        };

        let ids: Vec<u32> = registry.candidates().map(|p| p.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn test_validate_flags_bad_rules() {
        let mut p = partner(1, "Acme");
        p.fields = vec![
            FieldConfig {
                extract_rule: ExtractRule::PositionStart,
                ..FieldConfig::new(FieldName::AmountTotal)
            },
            FieldConfig::new(FieldName::Date),
            FieldConfig {
                extract_rule: ExtractRule::Max,
                ..FieldConfig::new(FieldName::InvoiceNumber)
            },
            FieldConfig {
                pattern: Some("([0-9".to_string()),
                ..FieldConfig::new(FieldName::Description)
            },
        ];
        let registry = PartnerRegistry {
            company_partner_id: None,
            partners: vec![p],
        };

        let issues = registry.validate();
        assert_eq!(issues.len(), 4);
        assert!(issues[0].contains("position rule without a position"));
        assert!(issues[1].contains("date field without a date format"));
        assert!(issues[2].contains("min/max"));
        assert!(issues[3].contains("invalid pattern"));
    }

    #[test]
    fn test_registry_roundtrip() {
        let registry = PartnerRegistry {
            company_partner_id: Some(1),
            partners: vec![partner(1, "My Company"), partner(2, "Acme")],
        };
        let json = serde_json::to_string(&registry).unwrap();
        let back: PartnerRegistry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.partners.len(), 2);
        assert_eq!(back.get(2).unwrap().name, "Acme");
    }
}
