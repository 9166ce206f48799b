//! Description field extraction.

use super::{custom_pattern, pattern_fragments, reject_ordering_rules, select_value, FieldMatch, RuleResult};
use crate::models::partner::FieldConfig;

/// Extract the description line from `text`.
///
/// A fixed value wins over pattern matching; vendors that always invoice the
/// same service configure the label once instead of a regex.
pub fn extract_description(text: &str, cfg: &FieldConfig) -> RuleResult<String> {
    reject_ordering_rules(cfg)?;

    if let Some(fixed) = &cfg.fixed_value {
        let fixed = fixed.trim();
        if !fixed.is_empty() {
            return Ok(Some(fixed.to_string()));
        }
    }

    let candidates: Vec<FieldMatch<String>> = match custom_pattern(cfg)? {
        Some(re) => pattern_fragments(&re, text)
            .into_iter()
            .map(|fragment| FieldMatch::new(fragment.trim().to_string(), fragment))
            .collect(),
        None => Vec::new(),
    };

    Ok(select_value(&candidates, cfg.extract_rule, cfg.position).filter(|v| !v.is_empty()))
}
