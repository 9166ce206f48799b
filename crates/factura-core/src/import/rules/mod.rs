//! Rule-based field extraction routines.
//!
//! Each routine collects candidate values with a regex (built-in or from the
//! field configuration), then selects one candidate with the configured
//! extraction rule. Routines never mutate configuration; a routine that
//! produces no value is a soft failure handled by the caller.

pub mod amounts;
pub mod dates;
pub mod description;
pub mod invoice_number;
pub mod patterns;

pub use amounts::{extract_amount, parse_amount};
pub use dates::extract_date;
pub use description::extract_description;
pub use invoice_number::extract_invoice_number;

use regex::Regex;

use crate::error::ImportError;
use crate::models::partner::{ExtractRule, FieldConfig};

/// Result type for extraction routines. `Ok(None)` is a soft failure; `Err`
/// means the field configuration itself cannot be applied.
pub type RuleResult<T> = Result<Option<T>, ImportError>;

/// One candidate value found in the source text.
#[derive(Debug, Clone)]
pub struct FieldMatch<T> {
    /// Parsed value.
    pub value: T,
    /// Source text that was matched.
    pub source: String,
}

impl<T> FieldMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            source: source.into(),
        }
    }
}

/// Select one candidate according to the extraction rule. Candidates are in
/// text order; positions are 1-based. Out of range is a soft failure.
pub fn select_value<T: Ord + Clone>(
    candidates: &[FieldMatch<T>],
    rule: ExtractRule,
    position: Option<u32>,
) -> Option<T> {
    let picked = match rule {
        ExtractRule::First => candidates.first(),
        ExtractRule::Last => candidates.last(),
        ExtractRule::PositionStart => {
            let n = position.unwrap_or(1) as usize;
            n.checked_sub(1).and_then(|i| candidates.get(i))
        }
        ExtractRule::PositionEnd => {
            let n = position.unwrap_or(1) as usize;
            candidates.len().checked_sub(n).and_then(|i| candidates.get(i))
        }
        ExtractRule::Min => candidates.iter().min_by(|a, b| a.value.cmp(&b.value)),
        ExtractRule::Max => candidates.iter().max_by(|a, b| a.value.cmp(&b.value)),
    };
    picked.map(|m| m.value.clone())
}

/// Compile a field's custom pattern, if any.
pub(crate) fn custom_pattern(cfg: &FieldConfig) -> Result<Option<Regex>, ImportError> {
    match &cfg.pattern {
        None => Ok(None),
        Some(pattern) => Regex::new(pattern).map(Some).map_err(|e| {
            ImportError::InvalidFieldConfig {
                field: cfg.name,
                reason: format!("invalid pattern: {e}"),
            }
        }),
    }
}

/// Fragments of `text` a custom pattern selects: the first capture group of
/// each match, or the whole match when the pattern has no groups.
pub(crate) fn pattern_fragments<'t>(re: &Regex, text: &'t str) -> Vec<&'t str> {
    re.captures_iter(text)
        .filter_map(|caps| {
            caps.get(1)
                .or_else(|| caps.get(0))
                .map(|m| m.as_str())
        })
        .collect()
}

/// Reject min/max on fields whose values have no meaningful ordering.
pub(crate) fn reject_ordering_rules(cfg: &FieldConfig) -> Result<(), ImportError> {
    if matches!(cfg.extract_rule, ExtractRule::Min | ExtractRule::Max) {
        return Err(ImportError::InvalidFieldConfig {
            field: cfg.name,
            reason: "min/max does not apply to text fields".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn candidates(values: &[i32]) -> Vec<FieldMatch<i32>> {
        values
            .iter()
            .map(|&v| FieldMatch::new(v, v.to_string()))
            .collect()
    }

    #[test]
    fn test_select_first_last() {
        let c = candidates(&[5, 2, 9]);
        assert_eq!(select_value(&c, ExtractRule::First, None), Some(5));
        assert_eq!(select_value(&c, ExtractRule::Last, None), Some(9));
    }

    #[test]
    fn test_select_positions() {
        let c = candidates(&[5, 2, 9]);
        assert_eq!(select_value(&c, ExtractRule::PositionStart, Some(2)), Some(2));
        assert_eq!(select_value(&c, ExtractRule::PositionEnd, Some(2)), Some(2));
        assert_eq!(select_value(&c, ExtractRule::PositionStart, Some(4)), None);
        assert_eq!(select_value(&c, ExtractRule::PositionEnd, Some(4)), None);
    }

    #[test]
    fn test_select_min_max() {
        let c = candidates(&[5, 2, 9]);
        assert_eq!(select_value(&c, ExtractRule::Min, None), Some(2));
        assert_eq!(select_value(&c, ExtractRule::Max, None), Some(9));
    }

    #[test]
    fn test_select_empty() {
        let c: Vec<FieldMatch<i32>> = Vec::new();
        assert_eq!(select_value(&c, ExtractRule::First, None), None);
    }

    #[test]
    fn test_pattern_fragments_capture_group() {
        let re = Regex::new(r"ref (\w+)").unwrap();
        assert_eq!(pattern_fragments(&re, "ref A1 and ref B2"), vec!["A1", "B2"]);
    }

    #[test]
    fn test_pattern_fragments_whole_match() {
        let re = Regex::new(r"\d+").unwrap();
        assert_eq!(pattern_fragments(&re, "a 12 b 34"), vec!["12", "34"]);
    }
}
