// Date normalization and calendar arithmetic.
// Every helper takes a `NaiveDate`; text input goes through `normalize_date` once at the boundary.
use anyhow::{anyhow, Result};
use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, Weekday};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y%m%d", "%Y/%m/%d"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Converts any accepted textual date into a `NaiveDate`.
///
/// Accepted: `YYYY-MM-DD`, `YYYYMMDD`, `YYYY/MM/DD`, and the dashed form followed
/// by a time of day (the time is discarded).
pub fn normalize_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }
    Err(anyhow!(
        "Invalid date '{}'. Expected one of: YYYY-MM-DD, YYYYMMDD, YYYY/MM/DD.",
        s
    ))
}

pub fn to_compact(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

pub fn to_dashed(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn days_ago(date: NaiveDate, n: i64) -> Result<NaiveDate> {
    Duration::try_days(n)
        .and_then(|span| date.checked_sub_signed(span))
        .ok_or_else(|| anyhow!("{} minus {} days is out of range", date, n))
}

pub fn weeks_ago(date: NaiveDate, n: i64) -> Result<NaiveDate> {
    Duration::try_weeks(n)
        .and_then(|span| date.checked_sub_signed(span))
        .ok_or_else(|| anyhow!("{} minus {} weeks is out of range", date, n))
}

pub fn last_day_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| anyhow!("Invalid year/month: {}-{}", year, month))?;
    let next = first
        .checked_add_months(Months::new(1))
        .ok_or_else(|| anyhow!("Month out of range after {}-{}", year, month))?;
    next.pred_opt()
        .ok_or_else(|| anyhow!("Month out of range before {}-{}", year, month))
}

pub fn is_month_end(date: NaiveDate) -> bool {
    date.succ_opt().map_or(true, |next| next.month() != date.month())
}

/// `n` calendar months before `date`. A month-end input stays on the month end
/// (2024-04-30 minus 1 month is 2024-03-31); other days clamp to the target month.
pub fn months_ago(date: NaiveDate, n: u32) -> Result<NaiveDate> {
    let shifted = date
        .checked_sub_months(Months::new(n))
        .ok_or_else(|| anyhow!("{} minus {} months is out of range", date, n))?;
    if is_month_end(date) {
        last_day_of_month(shifted.year(), shifted.month())
    } else {
        Ok(shifted)
    }
}

/// Subtracts years and months first, then days.
pub fn prior_date(date: NaiveDate, days: i64, months: u32, years: u32) -> Result<NaiveDate> {
    let total_months = years
        .checked_mul(12)
        .and_then(|m| m.checked_add(months))
        .ok_or_else(|| anyhow!("Month offset overflow"))?;
    let shifted = date
        .checked_sub_months(Months::new(total_months))
        .ok_or_else(|| anyhow!("{} minus {} months is out of range", date, total_months))?;
    days_ago(shifted, days)
}

pub fn last_day_of_previous_month(date: NaiveDate) -> Result<NaiveDate> {
    date.with_day(1)
        .and_then(|first| first.pred_opt())
        .ok_or_else(|| anyhow!("No previous month for {}", date))
}

fn parse_year_month(s: &str) -> Result<(i32, u32)> {
    let s = s.trim();
    if s.len() != 6 || !s.chars().all(|c| c.is_ascii_digit()) {
        return Err(anyhow!("The year-month '{}' must be in 'YYYYMM' format", s));
    }
    let year: i32 = s[..4].parse()?;
    let month: u32 = s[4..].parse()?;
    if !(1..=12).contains(&month) {
        return Err(anyhow!("The year-month '{}' must be in 'YYYYMM' format", s));
    }
    Ok((year, month))
}

/// Month ends from `start` through `end`, both given as `YYYYMM`, inclusive.
pub fn month_end_dates(start: &str, end: &str) -> Result<Vec<NaiveDate>> {
    let (mut year, mut month) = parse_year_month(start)?;
    let end = parse_year_month(end)?;

    let mut out = Vec::new();
    while (year, month) <= end {
        out.push(last_day_of_month(year, month)?);
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }
    Ok(out)
}

/// Consecutive month-end pairs: `[(m0, m1), (m1, m2), ...]`.
pub fn month_end_pairs(start: &str, end: &str) -> Result<Vec<(NaiveDate, NaiveDate)>> {
    let ends = month_end_dates(start, end)?;
    Ok(ends.windows(2).map(|w| (w[0], w[1])).collect())
}

/// Every day from `start` to `end`, inclusive. Empty when `end < start`.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|d| *d <= end).collect()
}

/// `date`, the day before, and so on: `n` dates in descending order.
pub fn past_dates(date: NaiveDate, n: usize) -> Result<Vec<NaiveDate>> {
    (0..n as i64).map(|i| days_ago(date, i)).collect()
}

pub fn first_days_of_months(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    date_range(start, end).into_iter().filter(|d| d.day() == 1).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekdayStyle {
    En,
    EnFull,
    Kr,
    KrFull,
}

pub fn weekday_name(date: NaiveDate, style: WeekdayStyle) -> &'static str {
    const EN: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
    const EN_FULL: [&str; 7] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"];
    const KR: [&str; 7] = ["월", "화", "수", "목", "금", "토", "일"];
    const KR_FULL: [&str; 7] = ["월요일", "화요일", "수요일", "목요일", "금요일", "토요일", "일요일"];

    let idx = date.weekday().num_days_from_monday() as usize;
    match style {
        WeekdayStyle::En => EN[idx],
        WeekdayStyle::EnFull => EN_FULL[idx],
        WeekdayStyle::Kr => KR[idx],
        WeekdayStyle::KrFull => KR_FULL[idx],
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// First day of a quarter written as `"2024 Q3"` or `"2024 3Q"`.
pub fn quarter_to_date(s: &str) -> Result<NaiveDate> {
    let mut parts = s.split_whitespace();
    let (Some(year), Some(quarter), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(anyhow!("Invalid quarter '{}'. Expected 'YYYY QX'.", s));
    };
    let year: i32 = year
        .parse()
        .map_err(|e| anyhow!("Invalid year in quarter '{}': {}", s, e))?;
    let quarter: u32 = quarter
        .trim_matches(|c| c == 'Q' || c == 'q')
        .parse()
        .map_err(|e| anyhow!("Invalid quarter number in '{}': {}", s, e))?;
    if !(1..=4).contains(&quarter) {
        return Err(anyhow!("Quarter must be between 1 and 4, got {}", quarter));
    }
    NaiveDate::from_ymd_opt(year, (quarter - 1) * 3 + 1, 1)
        .ok_or_else(|| anyhow!("Invalid quarter '{}'", s))
}

pub fn year_to_date(s: &str) -> Result<NaiveDate> {
    let year: i32 = s
        .trim()
        .parse()
        .map_err(|e| anyhow!("Invalid year '{}': {}", s, e))?;
    NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(|| anyhow!("Year out of range: {}", year))
}

/// Quarter labels from `start_year` down to `end_year`, newest first:
/// `["2024 4Q", "2024 3Q", ..., "2023 1Q"]`.
pub fn quarters_desc(start_year: i32, end_year: i32) -> Vec<String> {
    let mut out = Vec::new();
    let mut year = start_year;
    while year >= end_year {
        for q in ["4Q", "3Q", "2Q", "1Q"] {
            out.push(format!("{} {}", year, q));
        }
        year -= 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_normalize_date_formats() {
        assert_eq!(normalize_date("2024-02-29").unwrap(), d(2024, 2, 29));
        assert_eq!(normalize_date("20240229").unwrap(), d(2024, 2, 29));
        assert_eq!(normalize_date("2024/02/29").unwrap(), d(2024, 2, 29));
        assert_eq!(normalize_date(" 2024-02-29 13:45:00 ").unwrap(), d(2024, 2, 29));
        assert!(normalize_date("2023-02-29").is_err());
        assert!(normalize_date("29/02/2024").is_err());
    }

    #[test]
    fn test_compact_and_dashed() {
        assert_eq!(to_compact(d(2021, 1, 5)), "20210105");
        assert_eq!(to_dashed(d(2021, 1, 5)), "2021-01-05");
    }

    #[test]
    fn test_days_and_weeks_ago() {
        assert_eq!(days_ago(d(2024, 3, 1), 1).unwrap(), d(2024, 2, 29));
        assert_eq!(weeks_ago(d(2024, 1, 10), 2).unwrap(), d(2023, 12, 27));
    }

    #[test]
    fn test_out_of_range_offsets_are_errors() {
        assert!(days_ago(d(2024, 3, 1), i64::MAX).is_err());
        assert!(days_ago(NaiveDate::MIN, 1).is_err());
        assert!(weeks_ago(d(2024, 1, 10), i64::MAX / 2).is_err());
        assert!(prior_date(d(2024, 3, 31), 400_000_000, 0, 0).is_err());
        assert!(past_dates(NaiveDate::MIN, 2).is_err());
    }

    #[test]
    fn test_months_ago_sticks_to_month_end() {
        assert_eq!(months_ago(d(2024, 4, 30), 1).unwrap(), d(2024, 3, 31));
        assert_eq!(months_ago(d(2024, 3, 31), 1).unwrap(), d(2024, 2, 29));
        assert_eq!(months_ago(d(2024, 3, 15), 1).unwrap(), d(2024, 2, 15));
        assert_eq!(months_ago(d(2024, 3, 30), 1).unwrap(), d(2024, 2, 29));
    }

    #[test]
    fn test_prior_date_applies_months_before_days() {
        assert_eq!(prior_date(d(2024, 3, 31), 1, 1, 0).unwrap(), d(2024, 2, 28));
        assert_eq!(prior_date(d(2024, 2, 29), 0, 0, 1).unwrap(), d(2023, 2, 28));
    }

    #[test]
    fn test_month_end_helpers() {
        assert!(is_month_end(d(2023, 2, 28)));
        assert!(!is_month_end(d(2024, 2, 28)));
        assert_eq!(last_day_of_month(2024, 2).unwrap(), d(2024, 2, 29));
        assert_eq!(last_day_of_month(2023, 12).unwrap(), d(2023, 12, 31));
        assert!(last_day_of_month(2023, 13).is_err());
        assert_eq!(last_day_of_previous_month(d(2024, 1, 15)).unwrap(), d(2023, 12, 31));
    }

    #[test]
    fn test_month_end_dates_across_year() {
        let ends = month_end_dates("202311", "202402").unwrap();
        assert_eq!(ends, vec![d(2023, 11, 30), d(2023, 12, 31), d(2024, 1, 31), d(2024, 2, 29)]);

        let pairs = month_end_pairs("202311", "202401").unwrap();
        assert_eq!(pairs, vec![(d(2023, 11, 30), d(2023, 12, 31)), (d(2023, 12, 31), d(2024, 1, 31))]);

        assert!(month_end_dates("2023-11", "202402").is_err());
    }

    #[test]
    fn test_ranges() {
        assert_eq!(date_range(d(2024, 2, 27), d(2024, 3, 1)).len(), 4);
        assert!(date_range(d(2024, 3, 1), d(2024, 2, 1)).is_empty());
        assert_eq!(past_dates(d(2024, 3, 1), 3).unwrap(), vec![d(2024, 3, 1), d(2024, 2, 29), d(2024, 2, 28)]);
        assert_eq!(
            first_days_of_months(d(2024, 1, 15), d(2024, 3, 1)),
            vec![d(2024, 2, 1), d(2024, 3, 1)]
        );
    }

    #[test]
    fn test_weekday_names() {
        // 2024-05-17 was a Friday
        assert_eq!(weekday_name(d(2024, 5, 17), WeekdayStyle::En), "Fri");
        assert_eq!(weekday_name(d(2024, 5, 17), WeekdayStyle::EnFull), "Friday");
        assert_eq!(weekday_name(d(2024, 5, 17), WeekdayStyle::Kr), "금");
        assert_eq!(weekday_name(d(2024, 5, 19), WeekdayStyle::KrFull), "일요일");
        assert!(is_weekend(d(2024, 5, 19)));
    }

    #[test]
    fn test_quarters() {
        assert_eq!(quarter_to_date("2024 Q3").unwrap(), d(2024, 7, 1));
        assert_eq!(quarter_to_date("2024 4Q").unwrap(), d(2024, 10, 1));
        assert!(quarter_to_date("2024 Q5").is_err());
        assert!(quarter_to_date("2024").is_err());
        assert_eq!(year_to_date("2020").unwrap(), d(2020, 1, 1));

        let qs = quarters_desc(2024, 2023);
        assert_eq!(qs.len(), 8);
        assert_eq!(qs[0], "2024 4Q");
        assert_eq!(qs[7], "2023 1Q");
    }
}
