//! The transient result of one import attempt.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::partner::FieldName;

/// Structured fields extracted from one invoice document.
///
/// Built fresh per import attempt and returned to the caller; never stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedInvoice {
    /// Matched vendor id.
    pub partner_id: u32,

    /// Matched vendor display name.
    pub partner_name: String,

    /// Resolved currency code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Invoice number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,

    /// Description line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Invoice date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    /// Payment due date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_due: Option<NaiveDate>,

    /// Start of the invoiced period.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_start: Option<NaiveDate>,

    /// End of the invoiced period.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_end: Option<NaiveDate>,

    /// Total amount, tax included.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_total: Option<Decimal>,

    /// Untaxed amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_untaxed: Option<Decimal>,

    /// Tax amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_tax: Option<Decimal>,

    /// Fields whose extraction rule produced no value.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_fields: Vec<FieldName>,

    /// HTML fragments for the caller's document chatter.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<String>,
}

impl ParsedInvoice {
    /// Store an extracted date under its field name.
    pub fn set_date(&mut self, name: FieldName, value: NaiveDate) {
        match name {
            FieldName::Date => self.date = Some(value),
            FieldName::DateDue => self.date_due = Some(value),
            FieldName::DateStart => self.date_start = Some(value),
            FieldName::DateEnd => self.date_end = Some(value),
            _ => {}
        }
    }

    /// Store an extracted amount under its field name.
    pub fn set_amount(&mut self, name: FieldName, value: Decimal) {
        match name {
            FieldName::AmountTotal => self.amount_total = Some(value),
            FieldName::AmountUntaxed => self.amount_untaxed = Some(value),
            FieldName::AmountTax => self.amount_tax = Some(value),
            _ => {}
        }
    }
}
