// Number formatting helpers for spreadsheet exports and report text.
// Exports write numbers like "1,234,567" and fund codes that lost their leading zeros.

/// Parses "1,234.5" style numbers. Blank cells and the "-" placeholder read as `None`.
pub fn parse_commaed_number(s: &str) -> Option<f64> {
    let cleaned = s.trim().replace(',', "");
    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Restores a six-character fund code: "1234" and "1234.0" both become "001234".
pub fn normalize_fund_code(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let code = match raw.split_once('.') {
        Some((int_part, frac)) if frac.chars().all(|c| c == '0') => int_part,
        _ => raw,
    };
    Some(format!("{:0>6}", code))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitLanguage {
    Kr,
    En,
}

impl UnitLanguage {
    fn units(&self) -> &'static [(f64, &'static str)] {
        match self {
            UnitLanguage::Kr => &[(1e12, "조"), (1e8, "억"), (1e4, "만"), (1.0, "")],
            UnitLanguage::En => &[(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K"), (1.0, "")],
        }
    }
}

/// Spells a magnitude with unit words: 123_456_789 in Korean is "1억 2345만 6789".
///
/// `level` limits how many unit steps are used (largest first); the remainder
/// below the last step is dropped. The sign is ignored.
pub fn format_with_units(value: f64, language: UnitLanguage, level: Option<usize>) -> String {
    let units = language.units();
    let level = level.unwrap_or(units.len()).min(units.len());
    let mut number = value.abs();

    let mut parts = Vec::new();
    for (unit_value, unit_name) in &units[..level] {
        let count = (number / unit_value).floor();
        if count > 0.0 {
            parts.push(format!("{}{}", count as u64, unit_name));
        }
        number %= unit_value;
    }

    if parts.is_empty() {
        "0".to_string()
    } else {
        parts.join(" ")
    }
}

/// Groups the integer part with commas: 1234567.5 -> "1,234,567.5".
pub fn format_thousands(value: f64) -> String {
    let text = value.to_string();
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commaed_number() {
        assert_eq!(parse_commaed_number("1,234.5"), Some(1234.5));
        assert_eq!(parse_commaed_number(" 600,822,115 "), Some(600822115.0));
        assert_eq!(parse_commaed_number("-12"), Some(-12.0));
        assert_eq!(parse_commaed_number("-"), None);
        assert_eq!(parse_commaed_number(""), None);
        assert_eq!(parse_commaed_number("n/a"), None);
    }

    #[test]
    fn test_normalize_fund_code() {
        assert_eq!(normalize_fund_code("1234").as_deref(), Some("001234"));
        assert_eq!(normalize_fund_code("1234.0").as_deref(), Some("001234"));
        assert_eq!(normalize_fund_code("100000").as_deref(), Some("100000"));
        assert_eq!(normalize_fund_code("A1B2").as_deref(), Some("00A1B2"));
        assert_eq!(normalize_fund_code("  "), None);
    }

    #[test]
    fn test_format_with_units_korean() {
        assert_eq!(format_with_units(123_456_789.0, UnitLanguage::Kr, None), "1억 2345만 6789");
        assert_eq!(format_with_units(-50_000.0, UnitLanguage::Kr, None), "5만");
        assert_eq!(format_with_units(123_456_789.0, UnitLanguage::Kr, Some(3)), "1억 2345만");
        assert_eq!(format_with_units(0.4, UnitLanguage::Kr, None), "0");
    }

    #[test]
    fn test_format_with_units_english() {
        assert_eq!(format_with_units(2_500_000_000.0, UnitLanguage::En, None), "2B 500M");
        assert_eq!(format_with_units(1_234.0, UnitLanguage::En, Some(4)), "1K");
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(1234567.0), "1,234,567");
        assert_eq!(format_thousands(1234567.5), "1,234,567.5");
        assert_eq!(format_thousands(-1000.0), "-1,000");
        assert_eq!(format_thousands(999.0), "999");
    }
}
