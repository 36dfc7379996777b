use super::{FileNameCodec, Tag};

/// Identifies one logical time series in the store: all range files of a
/// subject, optionally narrowed to a menu and a fund code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesKey {
    pub subject: String,
    pub menu_code: Option<String>,
    pub fund_code: Option<String>,
}

impl SeriesKey {
    pub fn new(subject: impl Into<String>) -> Self {
        SeriesKey {
            subject: subject.into(),
            menu_code: None,
            fund_code: None,
        }
    }

    pub fn with_menu_code(mut self, menu_code: impl Into<String>) -> Self {
        self.menu_code = Some(menu_code.into());
        self
    }

    pub fn with_fund_code(mut self, fund_code: impl Into<String>) -> Self {
        self.fund_code = Some(fund_code.into());
        self
    }

    /// Regex matching the range snapshots of this series.
    pub fn range_pattern(&self, codec: &FileNameCodec) -> String {
        let mut pattern = format!("^{}-{}", regex::escape(codec.prefix()), regex::escape(&self.subject));
        if let Some(menu) = &self.menu_code {
            pattern.push_str(&format!("-{}{}", Tag::Menu.literal(), regex::escape(menu)));
        }
        if let Some(code) = &self.fund_code {
            pattern.push_str(&format!("-{}{}", Tag::Code.literal(), regex::escape(code)));
        }
        pattern.push_str(&format!(
            r"-{}\d{{8}}-{}\d{{8}}-{}\d{{12}}",
            Tag::From.literal(),
            Tag::To.literal(),
            Tag::Save.literal()
        ));
        pattern
    }

    /// Regex matching any file of this subject/menu carrying a fund code.
    pub fn coded_pattern(&self, codec: &FileNameCodec) -> String {
        let mut pattern = format!("^{}-{}", regex::escape(codec.prefix()), regex::escape(&self.subject));
        if let Some(menu) = &self.menu_code {
            pattern.push_str(&format!("-{}{}", Tag::Menu.literal(), regex::escape(menu)));
        }
        pattern.push_str(&format!(r"-{}\w{{6}}", Tag::Code.literal()));
        pattern
    }
}
