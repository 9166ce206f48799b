//! Whitespace normalization for matching invoice text.
//!
//! Vendor keywords and VAT numbers are matched against text with all space
//! characters removed, so that PDF extractors that break words apart (or use
//! exotic space code points) do not defeat substring matching.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // U+0020, U+00A0 and the Unicode space-separator family actually seen in
    // PDF output. Tabs and newlines are intentionally not part of the set.
    static ref SPACES: Regex =
        Regex::new("[\u{0020}\u{00a0}\u{2000}-\u{200a}\u{202f}\u{205f}]+").unwrap();
}

/// Remove every space character from `text`, leaving all other characters
/// untouched.
pub fn strip_spaces(text: &str) -> String {
    SPACES.replace_all(text, "").into_owned()
}

/// Text extracted from one document, in the variants the import pipeline
/// consumes.
#[derive(Debug, Clone, Default)]
pub struct DocumentText {
    /// Whole-document text.
    pub all: String,
    /// First-page text.
    pub first: String,
    /// Whole-document text with the space set stripped.
    pub all_no_space: String,
    /// First-page text with the space set stripped.
    pub first_no_space: String,
}

impl DocumentText {
    /// Build all variants from whole-document and first-page text.
    pub fn new(all: String, first: String) -> Self {
        let all_no_space = strip_spaces(&all);
        let first_no_space = strip_spaces(&first);
        Self {
            all,
            first,
            all_no_space,
            first_no_space,
        }
    }

    /// Build variants for a document where only one page exists (or page
    /// boundaries are unknown): first-page text equals whole-document text.
    pub fn single_page(all: String) -> Self {
        let first = all.clone();
        Self::new(all, first)
    }
}
