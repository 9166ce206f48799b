//! Amount field extraction.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::AMOUNT;
use super::{custom_pattern, pattern_fragments, select_value, FieldMatch, RuleResult};
use crate::models::partner::FieldConfig;

/// Extract one amount from `text` according to the field configuration.
///
/// Candidates are decimal amounts with two fraction digits, tolerating
/// space/NBSP/dot/comma thousand grouping and comma or dot as the decimal
/// separator. A custom pattern restricts the search to its captured
/// fragments. The extraction rule then picks one candidate.
pub fn extract_amount(text: &str, cfg: &FieldConfig) -> RuleResult<Decimal> {
    let candidates = match custom_pattern(cfg)? {
        Some(re) => pattern_fragments(&re, text)
            .into_iter()
            .filter_map(|fragment| {
                let raw = AMOUNT.find(fragment)?.as_str();
                parse_amount(raw).map(|value| FieldMatch::new(value, fragment))
            })
            .collect(),
        None => AMOUNT
            .find_iter(text)
            .filter_map(|m| parse_amount(m.as_str()).map(|value| FieldMatch::new(value, m.as_str())))
            .collect::<Vec<_>>(),
    };

    Ok(select_value(&candidates, cfg.extract_rule, cfg.position))
}

/// Parse a formatted amount (e.g. "1 234,56", "1.234,56" or "1,234.56").
pub fn parse_amount(s: &str) -> Option<Decimal> {
    // Drop grouping spaces; keep digits and both separator characters.
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    let normalized = if cleaned.contains(',') && !cleaned.contains('.') {
        cleaned.replace(',', ".")
    } else if cleaned.contains(',') && cleaned.contains('.') {
        // Whichever separator comes last is the decimal one.
        let comma_pos = cleaned.rfind(',');
        let dot_pos = cleaned.rfind('.');
        match (comma_pos, dot_pos) {
            (Some(c), Some(d)) if c > d => cleaned.replace('.', "").replace(',', "."),
            (Some(_), Some(_)) => cleaned.replace(',', ""),
            _ => cleaned,
        }
    } else {
        cleaned
    };

    Decimal::from_str(&normalized).ok()
}
