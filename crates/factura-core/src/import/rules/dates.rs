//! Date field extraction.

use chrono::NaiveDate;
use regex::Regex;

use super::patterns::{
    month_to_number, DATE_DD_MONTH_Y4, DATE_MONTH_DD_Y4, DATE_NUMERIC_Y2, DATE_NUMERIC_Y4,
    DATE_Y4_NUMERIC,
};
use super::{custom_pattern, pattern_fragments, select_value, FieldMatch, RuleResult};
use crate::models::partner::{DateFormat, FieldConfig};

/// Extract one date from `text` according to the field configuration.
///
/// Candidates are matched with the pattern for the configured date format;
/// a custom pattern restricts the search to its captured fragments. The
/// extraction rule then picks one candidate (min = oldest, max = newest).
pub fn extract_date(text: &str, cfg: &FieldConfig) -> RuleResult<NaiveDate> {
    let format = cfg.date_format.unwrap_or_default();

    let candidates = match custom_pattern(cfg)? {
        Some(re) => pattern_fragments(&re, text)
            .into_iter()
            .filter_map(|fragment| {
                collect_dates(fragment, format)
                    .into_iter()
                    .next()
                    .map(|m| FieldMatch::new(m.value, fragment))
            })
            .collect(),
        None => collect_dates(text, format),
    };

    Ok(select_value(&candidates, cfg.extract_rule, cfg.position))
}

/// All parseable dates in `text` for one format, in text order.
fn collect_dates(text: &str, format: DateFormat) -> Vec<FieldMatch<NaiveDate>> {
    let re: &Regex = match format {
        DateFormat::DdMmY4 | DateFormat::MmDdY4 => &DATE_NUMERIC_Y4,
        DateFormat::DdMmY2 | DateFormat::MmDdY2 => &DATE_NUMERIC_Y2,
        DateFormat::Y4MmDd => &DATE_Y4_NUMERIC,
        DateFormat::DdMonthY4 => &DATE_DD_MONTH_Y4,
        DateFormat::MonthDdY4 => &DATE_MONTH_DD_Y4,
    };

    re.captures_iter(text)
        .filter_map(|caps| {
            let (year, month, day) = match format {
                DateFormat::DdMmY4 => (
                    caps[3].parse().unwrap_or(0),
                    caps[2].parse().unwrap_or(0),
                    caps[1].parse().unwrap_or(0),
                ),
                DateFormat::MmDdY4 => (
                    caps[3].parse().unwrap_or(0),
                    caps[1].parse().unwrap_or(0),
                    caps[2].parse().unwrap_or(0),
                ),
                DateFormat::Y4MmDd => (
                    caps[1].parse().unwrap_or(0),
                    caps[2].parse().unwrap_or(0),
                    caps[3].parse().unwrap_or(0),
                ),
                DateFormat::DdMmY2 => (
                    expand_year(caps[3].parse().unwrap_or(0)),
                    caps[2].parse().unwrap_or(0),
                    caps[1].parse().unwrap_or(0),
                ),
                DateFormat::MmDdY2 => (
                    expand_year(caps[3].parse().unwrap_or(0)),
                    caps[1].parse().unwrap_or(0),
                    caps[2].parse().unwrap_or(0),
                ),
                DateFormat::DdMonthY4 => (
                    caps[3].parse().unwrap_or(0),
                    month_to_number(&caps[2]),
                    caps[1].parse().unwrap_or(0),
                ),
                DateFormat::MonthDdY4 => (
                    caps[3].parse().unwrap_or(0),
                    month_to_number(&caps[1]),
                    caps[2].parse().unwrap_or(0),
                ),
            };

            let date = NaiveDate::from_ymd_opt(year, month, day)?;
            let source = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
            Some(FieldMatch::new(date, source))
        })
        .collect()
}

/// Two-digit years: 00-50 map to 2000s, 51-99 to 1900s.
fn expand_year(year: i32) -> i32 {
    if year <= 50 {
        2000 + year
    } else {
        1900 + year
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::partner::{ExtractRule, FieldName};

    fn cfg(format: DateFormat) -> FieldConfig {
        FieldConfig {
            date_format: Some(format),
            ..FieldConfig::new(FieldName::Date)
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_dd_mm_y4() {
        let got = extract_date("Date: 31.12.2024", &cfg(DateFormat::DdMmY4)).unwrap();
        assert_eq!(got, Some(date(2024, 12, 31)));
    }

    #[test]
    fn test_mm_dd_y4() {
        let got = extract_date("Date: 12/31/2024", &cfg(DateFormat::MmDdY4)).unwrap();
        assert_eq!(got, Some(date(2024, 12, 31)));
    }

    #[test]
    fn test_y4_mm_dd() {
        let got = extract_date("2024-12-31", &cfg(DateFormat::Y4MmDd)).unwrap();
        assert_eq!(got, Some(date(2024, 12, 31)));
    }

    #[test]
    fn test_two_digit_year_pivot() {
        let got = extract_date("31-12-24", &cfg(DateFormat::DdMmY2)).unwrap();
        assert_eq!(got, Some(date(2024, 12, 31)));

        let got = extract_date("31-12-99", &cfg(DateFormat::DdMmY2)).unwrap();
        assert_eq!(got, Some(date(1999, 12, 31)));
    }

    #[test]
    fn test_month_name_english_and_french() {
        let got = extract_date("Issued 31 December 2024", &cfg(DateFormat::DdMonthY4)).unwrap();
        assert_eq!(got, Some(date(2024, 12, 31)));

        let got = extract_date("Émise le 1er décembre 2024", &cfg(DateFormat::DdMonthY4)).unwrap();
        assert_eq!(got, Some(date(2024, 12, 1)));

        let got = extract_date("December 31, 2024", &cfg(DateFormat::MonthDdY4)).unwrap();
        assert_eq!(got, Some(date(2024, 12, 31)));
    }

    #[test]
    fn test_invalid_calendar_date_skipped() {
        let got = extract_date("32.13.2024 then 05.06.2024", &cfg(DateFormat::DdMmY4)).unwrap();
        assert_eq!(got, Some(date(2024, 6, 5)));
    }

    #[test]
    fn test_min_max_rules() {
        let text = "From 01.02.2024 to 15.01.2024, due 28.02.2024";

        let mut c = cfg(DateFormat::DdMmY4);
        c.extract_rule = ExtractRule::Min;
        assert_eq!(extract_date(text, &c).unwrap(), Some(date(2024, 1, 15)));

        c.extract_rule = ExtractRule::Max;
        assert_eq!(extract_date(text, &c).unwrap(), Some(date(2024, 2, 28)));
    }

    #[test]
    fn test_position_from_end() {
        let text = "01.01.2024 02.01.2024 03.01.2024";
        let mut c = cfg(DateFormat::DdMmY4);
        c.extract_rule = ExtractRule::PositionEnd;
        c.position = Some(2);
        assert_eq!(extract_date(text, &c).unwrap(), Some(date(2024, 1, 2)));
    }

    #[test]
    fn test_custom_pattern_restricts_search() {
        let text = "Order date 01.01.2024\nInvoice date: 15.02.2024";
        let mut c = cfg(DateFormat::DdMmY4);
        c.pattern = Some(r"Invoice date: (\S+)".to_string());
        assert_eq!(extract_date(text, &c).unwrap(), Some(date(2024, 2, 15)));
    }

    #[test]
    fn test_bad_custom_pattern_is_hard_error() {
        let mut c = cfg(DateFormat::DdMmY4);
        c.pattern = Some("([".to_string());
        assert!(extract_date("01.01.2024", &c).is_err());
    }

    #[test]
    fn test_no_candidates_is_soft_failure() {
        let got = extract_date("no dates here", &cfg(DateFormat::DdMmY4)).unwrap();
        assert_eq!(got, None);
    }
}
