//! Built-in regex patterns for field extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Amounts: 1 234,56 / 1234.56 / 1.234,56 / 1,234.56
    pub static ref AMOUNT: Regex = Regex::new(
        r"(?:\d{1,3}(?:[\s\u{00a0}.,]\d{3})*|\d+)[.,]\d{2}\b"
    ).unwrap();

    // Labeled invoice number: "Invoice no 2024/001", "Facture n° FA-18"
    pub static ref INVOICE_NUMBER: Regex = Regex::new(
        r"(?i)(?:invoice|facture|bill|inv\.?)\s*(?:n[°o]\.?|nr\.?|number|num[ée]ro|#)?\s*:?\s*([A-Za-z0-9][A-Za-z0-9/\-_.]*)"
    ).unwrap();

    // Numeric dates, day or month first: 31.12.2024, 31/12/2024, 31-12-2024, 31 12 2024
    pub static ref DATE_NUMERIC_Y4: Regex = Regex::new(
        r"\b(\d{1,2})[./\- ](\d{1,2})[./\- ](\d{4})\b"
    ).unwrap();

    // Numeric dates with a two-digit year: 31.12.24
    pub static ref DATE_NUMERIC_Y2: Regex = Regex::new(
        r"\b(\d{1,2})[./\- ](\d{1,2})[./\- ](\d{2})\b"
    ).unwrap();

    // Year first: 2024-12-31
    pub static ref DATE_Y4_NUMERIC: Regex = Regex::new(
        r"\b(\d{4})[./\- ](\d{1,2})[./\- ](\d{1,2})\b"
    ).unwrap();

    // Day then month name: "31 December 2024", "1er décembre 2024", "3rd Sept. 2024"
    pub static ref DATE_DD_MONTH_Y4: Regex = Regex::new(
        r"(?i)\b(\d{1,2})(?:st|nd|rd|th|er)?\s+(\p{L}+)\.?,?\s+(\d{4})\b"
    ).unwrap();

    // Month name then day: "December 31, 2024"
    pub static ref DATE_MONTH_DD_Y4: Regex = Regex::new(
        r"(?i)\b(\p{L}+)\.?\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})\b"
    ).unwrap();
}

/// Month name to number, English and French, full names and common
/// abbreviations. Returns 0 for an unknown name.
pub fn month_to_number(name: &str) -> u32 {
    match name.trim_end_matches('.').to_lowercase().as_str() {
        "january" | "janvier" | "jan" => 1,
        "february" | "février" | "fevrier" | "feb" | "févr" | "fevr" => 2,
        "march" | "mars" | "mar" => 3,
        "april" | "avril" | "apr" | "avr" => 4,
        "may" | "mai" => 5,
        "june" | "juin" | "jun" => 6,
        "july" | "juillet" | "jul" | "juil" => 7,
        "august" | "août" | "aout" | "aug" => 8,
        "september" | "septembre" | "sep" | "sept" => 9,
        "october" | "octobre" | "oct" => 10,
        "november" | "novembre" | "nov" => 11,
        "december" | "décembre" | "decembre" | "dec" | "déc" => 12,
        _ => 0,
    }
}
