// Segment-based date extraction: the date is whatever follows a marker such as
// "-at" up to the next '-'. Looser than `decode_field`, used for older names
// that may carry "-between"/"-and" periods instead of tagged ranges.
use chrono::NaiveDate;

/// Date markers understood by the extractors.
pub const REF_MARKER: &str = "-at";
pub const FROM_MARKER: &str = "-from";
pub const TO_MARKER: &str = "-to";
pub const BETWEEN_MARKER: &str = "-between";
pub const AND_MARKER: &str = "-and";

/// Date after the last occurrence of `marker`, read from the leading 8 digits
/// of the segment that follows it.
pub fn extract_date_after(file_name: &str, marker: &str) -> Option<NaiveDate> {
    let (_, tail) = file_name.rsplit_once(marker)?;
    let segment = tail.split('-').next()?;
    let digits = segment.get(..8)?;
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(digits, "%Y%m%d").ok()
}

pub fn extract_date_ref(file_name: &str) -> Option<NaiveDate> {
    extract_date_after(file_name, REF_MARKER)
}

pub fn extract_date_pair(file_name: &str, start_marker: &str, end_marker: &str) -> Option<(NaiveDate, NaiveDate)> {
    Some((
        extract_date_after(file_name, start_marker)?,
        extract_date_after(file_name, end_marker)?,
    ))
}

pub fn extract_timeseries_pair(file_name: &str) -> Option<(NaiveDate, NaiveDate)> {
    extract_date_pair(file_name, FROM_MARKER, TO_MARKER)
}

pub fn extract_period_pair(file_name: &str) -> Option<(NaiveDate, NaiveDate)> {
    extract_date_pair(file_name, BETWEEN_MARKER, AND_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_extract_ref_date() {
        assert_eq!(extract_date_ref("dataset-menu2205-code000000-at20240531-save202406010800.csv"), Some(d(2024, 5, 31)));
        assert_eq!(extract_date_ref("dataset-menu2205-at20240531.csv"), Some(d(2024, 5, 31)));
        assert_eq!(extract_date_ref("dataset-menu2205-save202406010800.csv"), None);
    }

    #[test]
    fn test_extract_pairs() {
        let name = "dataset-prices-from20230101-to20231231-save202401010000.csv";
        assert_eq!(extract_timeseries_pair(name), Some((d(2023, 1, 1), d(2023, 12, 31))));

        let period = "report-flows-between20240101-and20240331.json";
        assert_eq!(extract_period_pair(period), Some((d(2024, 1, 1), d(2024, 3, 31))));
        assert_eq!(extract_period_pair(name), None);
    }

    #[test]
    fn test_extract_rejects_non_dates() {
        assert_eq!(extract_date_ref("dataset-x-atlas-save202401010000"), None);
        assert_eq!(extract_date_ref("dataset-x-at2024"), None);
    }
}
