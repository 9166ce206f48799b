//! Invoice number extraction.

use super::patterns::INVOICE_NUMBER;
use super::{custom_pattern, pattern_fragments, reject_ordering_rules, select_value, FieldMatch, RuleResult};
use crate::models::partner::FieldConfig;

/// Extract the invoice number from `text`.
///
/// Candidates come from the custom pattern's capture group, or from the
/// built-in labeled pattern ("Invoice no ...", "Facture n° ...").
pub fn extract_invoice_number(text: &str, cfg: &FieldConfig) -> RuleResult<String> {
    reject_ordering_rules(cfg)?;

    let candidates: Vec<FieldMatch<String>> = match custom_pattern(cfg)? {
        Some(re) => pattern_fragments(&re, text)
            .into_iter()
            .map(|fragment| FieldMatch::new(fragment.trim().to_string(), fragment))
            .collect(),
        None => INVOICE_NUMBER
            .captures_iter(text)
            .map(|caps| {
                let full = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
                FieldMatch::new(caps[1].trim().to_string(), full)
            })
            .collect(),
    };

    Ok(select_value(&candidates, cfg.extract_rule, cfg.position).filter(|v| !v.is_empty()))
}
