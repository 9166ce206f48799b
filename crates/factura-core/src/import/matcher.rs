//! Vendor matching over whitespace-stripped document text.

use tracing::debug;

use crate::models::partner::{Partner, PartnerRegistry};

/// How a partner was matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchMethod {
    /// Every keyword was found in the normalized text.
    Keywords(Vec<String>),
    /// The VAT number was found in the normalized text.
    Vat(String),
}

/// A successful vendor match.
#[derive(Debug, Clone)]
pub struct PartnerMatch<'a> {
    pub partner: &'a Partner,
    pub method: MatchMethod,
}

impl PartnerMatch<'_> {
    /// HTML fragment describing the match, for test-mode reporting.
    pub fn report(&self) -> String {
        match &self.method {
            MatchMethod::Keywords(keywords) => format!(
                "<li>Successful match on {} keyword(s) ({})</li>",
                keywords.len(),
                keywords.join(", ")
            ),
            MatchMethod::Vat(vat) => {
                format!("<li>Successful match on VAT number '{}'</li>", vat)
            }
        }
    }
}

/// Find the vendor for a document.
///
/// Candidates are scanned in registry order; the first match wins. A
/// candidate with keywords matches only if every keyword is a substring of
/// the normalized text; its VAT is then never consulted. A candidate with
/// only a VAT matches if the VAT string is a substring. Invoices usually
/// also carry the customer's own VAT number, which is why the registry
/// excludes the host company's record from the candidate set.
pub fn match_partner<'a>(
    registry: &'a PartnerRegistry,
    text_no_space: &str,
) -> Option<PartnerMatch<'a>> {
    for partner in registry.candidates() {
        if let Some(keywords) = partner.keyword_list() {
            if keywords.iter().all(|k| text_no_space.contains(k.as_str())) {
                debug!(
                    "Matched partner '{}' on {} keyword(s)",
                    partner.name,
                    keywords.len()
                );
                return Some(PartnerMatch {
                    partner,
                    method: MatchMethod::Keywords(keywords),
                });
            }
        } else if let Some(vat) = &partner.vat {
            if text_no_space.contains(vat.as_str()) {
                debug!("Matched partner '{}' on VAT number {}", partner.name, vat);
                return Some(PartnerMatch {
                    partner,
                    method: MatchMethod::Vat(vat.clone()),
                });
            }
        }
    }
    None
}
