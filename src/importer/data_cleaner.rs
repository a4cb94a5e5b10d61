// ==========================================
// Humidor Hub - Cell-level cleaning and coercion
// ==========================================
// Rules per value type:
// - String: trim, empty -> absent
// - Number: longest leading numeric prefix, else lenient 0
// - Boolean: "true" / "1" -> true
// - StringArray: ';' separated, trimmed, empties dropped
// - IsoDate: several common layouts -> UTC, else absent
// ==========================================

use crate::domain::record::truncate_to_millis;
use crate::importer::catalog_importer_trait::DataCleaner as DataCleanerTrait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Separator of StringArray cells, on import and export
pub const LIST_SEPARATOR: char = ';';

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

#[derive(Debug, Clone, Copy, Default)]
pub struct DataCleaner;

/// Byte length of the longest prefix that reads as a decimal number
/// (optional sign, digits, optional fraction, optional exponent)
fn numeric_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if digits > 0 || j > frac_start {
            digits += j - frac_start;
            i = j;
        }
    }

    if digits == 0 {
        return 0;
    }

    // Exponent only counts when followed by at least one digit
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    i
}

impl DataCleanerTrait for DataCleaner {
    fn clean_text(&self, value: &str) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    fn parse_number(&self, value: &str) -> Option<f64> {
        let trimmed = value.trim_start();
        let len = numeric_prefix_len(trimmed);
        if len == 0 {
            return None;
        }
        trimmed[..len].parse::<f64>().ok().filter(|n| n.is_finite())
    }

    fn parse_flag(&self, value: &str) -> bool {
        matches!(value.trim().to_lowercase().as_str(), "true" | "1")
    }

    fn split_list(&self, value: &str) -> Vec<String> {
        value
            .split(LIST_SEPARATOR)
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn parse_date(&self, value: &str) -> Option<DateTime<Utc>> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }

        parse_date_utc(trimmed).map(truncate_to_millis)
    }
}

fn parse_date_utc(trimmed: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    DATE_FORMATS.iter().find_map(|format| {
        NaiveDate::parse_from_str(trimmed, format)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Utc.from_utc_datetime(&naive))
    })
}

impl DataCleaner {
    /// Inverse of split_list, used by the CSV export
    pub fn join_list(items: &[String]) -> String {
        items.join(&LIST_SEPARATOR.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::{format_timestamp, FieldValue};
    use crate::domain::types::ValueType;
    use crate::importer::catalog_importer_trait::Coerced;

    #[test]
    fn test_clean_text() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.clean_text("  Maduro "), Some("Maduro".to_string()));
        assert_eq!(cleaner.clean_text("   "), None);
        assert_eq!(cleaner.clean_text(""), None);
    }

    #[test]
    fn test_parse_number_prefix() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.parse_number("12"), Some(12.0));
        assert_eq!(cleaner.parse_number(" 6.5 inches"), Some(6.5));
        assert_eq!(cleaner.parse_number("12abc"), Some(12.0));
        assert_eq!(cleaner.parse_number("-3"), Some(-3.0));
        assert_eq!(cleaner.parse_number(".5"), Some(0.5));
        assert_eq!(cleaner.parse_number("5."), Some(5.0));
        assert_eq!(cleaner.parse_number("1e3"), Some(1000.0));
        assert_eq!(cleaner.parse_number("2e"), Some(2.0));
        assert_eq!(cleaner.parse_number("abc"), None);
        assert_eq!(cleaner.parse_number("."), None);
        assert_eq!(cleaner.parse_number(""), None);
    }

    #[test]
    fn test_number_coercion_falls_back_to_zero() {
        let cleaner = DataCleaner;
        for cell in [Some(""), Some("abc"), None] {
            assert_eq!(
                cleaner.coerce(cell, ValueType::Number),
                Coerced::Lenient(FieldValue::Number(0.0)),
                "cell {:?}",
                cell
            );
        }
        assert_eq!(
            cleaner.coerce(Some("42"), ValueType::Number),
            Coerced::Value(FieldValue::Number(42.0))
        );
    }

    #[test]
    fn test_boolean_coercion() {
        let cleaner = DataCleaner;
        for truthy in ["TRUE", "true", "1", " True "] {
            assert!(cleaner.parse_flag(truthy), "{}", truthy);
        }
        for falsy in ["false", "0", "", "yes", "FALSE"] {
            assert!(!cleaner.parse_flag(falsy), "{}", falsy);
        }
        assert_eq!(
            cleaner.coerce(None, ValueType::Boolean),
            Coerced::Value(FieldValue::Flag(false))
        );
    }

    #[test]
    fn test_split_and_join_list() {
        let cleaner = DataCleaner;
        let notes = cleaner.split_list("earthy;spicy;sweet");
        assert_eq!(notes, vec!["earthy", "spicy", "sweet"]);
        assert_eq!(DataCleaner::join_list(&notes), "earthy;spicy;sweet");

        assert_eq!(cleaner.split_list(" cedar ; ;leather; "), vec!["cedar", "leather"]);
        assert!(cleaner.split_list("").is_empty());
    }

    #[test]
    fn test_parse_date_formats() {
        let cleaner = DataCleaner;
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();

        assert_eq!(cleaner.parse_date("2024-03-01"), Some(expected));
        assert_eq!(cleaner.parse_date("03/01/2024"), Some(expected));
        assert_eq!(cleaner.parse_date("2024-03-01T00:00:00.000Z"), Some(expected));
        assert_eq!(cleaner.parse_date("2024-03-01T02:00:00+02:00"), Some(expected));
        assert_eq!(
            cleaner.parse_date("2024-03-01 10:30:00"),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap())
        );
        assert_eq!(cleaner.parse_date("last tuesday"), None);
        assert_eq!(cleaner.parse_date(""), None);
    }

    #[test]
    fn test_parse_date_drops_sub_millisecond_digits() {
        let cleaner = DataCleaner;
        let parsed = cleaner.parse_date("2024-03-01T12:00:00.123456789Z").unwrap();
        assert_eq!(parsed.timestamp_subsec_nanos(), 123_000_000);

        let exported = format_timestamp(&parsed);
        assert_eq!(exported, "2024-03-01T12:00:00.123Z");
        assert_eq!(cleaner.parse_date(&exported), Some(parsed));
    }

    #[test]
    fn test_unparseable_date_is_absent() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.coerce(Some("soon"), ValueType::IsoDate), Coerced::Absent);
        assert_eq!(cleaner.coerce(Some("  "), ValueType::String), Coerced::Absent);
    }
}
