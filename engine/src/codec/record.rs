use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::dates::to_compact;
use shared::models::SaveStamp;

use super::{decode_date, decode_tag, pick_save_stamp, Tag};
use crate::error::{EngineError, Result};

/// Which dates a file covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateSpan {
    Undated,
    At(NaiveDate),
    Range { start: NaiveDate, end: NaiveDate },
}

impl DateSpan {
    /// Accepts a reference date alone, a complete start/end pair, or nothing.
    pub fn from_parts(
        ref_date: Option<NaiveDate>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Self> {
        match (ref_date, start_date, end_date) {
            (None, None, None) => Ok(DateSpan::Undated),
            (Some(at), None, None) => Ok(DateSpan::At(at)),
            (None, Some(start), Some(end)) => Ok(DateSpan::Range { start, end }),
            (Some(_), _, _) => Err(EngineError::InvalidRecord(
                "a reference date cannot be combined with a start/end range".to_string(),
            )),
            _ => Err(EngineError::InvalidRecord(
                "start and end dates must be given together".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNameRecord {
    pub subject: String,
    pub menu_code: Option<String>,
    pub fund_code: Option<String>,
    pub span: DateSpan,
    pub save: SaveStamp,
    /// Without the leading dot.
    pub extension: Option<String>,
}

impl FileNameRecord {
    pub fn new(subject: impl Into<String>, save: SaveStamp) -> Self {
        FileNameRecord {
            subject: subject.into(),
            menu_code: None,
            fund_code: None,
            span: DateSpan::Undated,
            save,
            extension: None,
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

    pub fn with_span(mut self, span: DateSpan) -> Self {
        self.span = span;
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    fn validate(&self) -> Result<()> {
        // Subject text is not checked for tags or hyphens; keeping it clean is up to the caller.
        if self.subject.is_empty() {
            return Err(EngineError::InvalidRecord("subject must not be empty".to_string()));
        }
        if let Some(menu) = &self.menu_code {
            if menu.len() != Tag::Menu.width() || !menu.chars().all(|c| c.is_ascii_digit()) {
                return Err(EngineError::InvalidRecord(format!(
                    "menu code must be 4 digits, got '{}'",
                    menu
                )));
            }
        }
        if let Some(code) = &self.fund_code {
            if code.chars().count() != Tag::Code.width() || !code.chars().all(super::is_word_char) {
                return Err(EngineError::InvalidRecord(format!(
                    "fund code must be 6 word characters, got '{}'",
                    code
                )));
            }
        }
        Ok(())
    }
}

/// Encodes and decodes file names under one prefix (`dataset` by default).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNameCodec {
    prefix: String,
}

impl Default for FileNameCodec {
    fn default() -> Self {
        FileNameCodec::new("dataset")
    }
}

impl FileNameCodec {
    pub fn new(prefix: impl Into<String>) -> Self {
        FileNameCodec { prefix: prefix.into() }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn encode(&self, record: &FileNameRecord) -> Result<String> {
        record.validate()?;

        let mut parts = vec![self.prefix.clone(), record.subject.clone()];
        if let Some(menu) = &record.menu_code {
            parts.push(format!("{}{}", Tag::Menu.literal(), menu));
        }
        if let Some(code) = &record.fund_code {
            parts.push(format!("{}{}", Tag::Code.literal(), code));
        }
        match record.span {
            DateSpan::Undated => {}
            DateSpan::At(at) => parts.push(format!("{}{}", Tag::At.literal(), to_compact(at))),
            DateSpan::Range { start, end } => {
                parts.push(format!("{}{}", Tag::From.literal(), to_compact(start)));
                parts.push(format!("{}{}", Tag::To.literal(), to_compact(end)));
            }
        }
        parts.push(format!("{}{}", Tag::Save.literal(), record.save.compact()));

        let mut name = parts.join("-");
        if let Some(ext) = &record.extension {
            name.push('.');
            name.push_str(ext.trim_start_matches('.'));
        }
        Ok(name)
    }

    /// Flat-argument form of `encode`.
    #[allow(clippy::too_many_arguments)]
    pub fn encode_parts(
        &self,
        subject: &str,
        save: SaveStamp,
        ref_date: Option<NaiveDate>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        fund_code: Option<&str>,
        menu_code: Option<&str>,
    ) -> Result<String> {
        let record = FileNameRecord {
            subject: subject.to_string(),
            menu_code: menu_code.map(str::to_string),
            fund_code: fund_code.map(str::to_string),
            span: DateSpan::from_parts(ref_date, start_date, end_date)?,
            save,
            extension: None,
        };
        self.encode(&record)
    }

    /// Reads a full record back. The subject is everything between the prefix
    /// and the first tagged segment; the save stamp is required.
    pub fn decode(&self, file_name: &str) -> Result<FileNameRecord> {
        let (stem, extension) = split_extension(file_name);
        let rest = stem
            .strip_prefix(&self.prefix)
            .and_then(|s| s.strip_prefix('-'))
            .ok_or_else(|| {
                EngineError::InvalidRecord(format!(
                    "'{}' does not start with '{}-'",
                    file_name, self.prefix
                ))
            })?;

        let segments: Vec<&str> = rest.split('-').collect();
        let subject_len = segments
            .iter()
            .position(|seg| Tag::ALL.iter().any(|tag| tag.matches_segment(seg)))
            .unwrap_or(segments.len());
        if subject_len == 0 {
            return Err(EngineError::InvalidRecord(format!("'{}' has no subject", file_name)));
        }
        let subject = segments[..subject_len].join("-");
        let tagged = segments[subject_len..].join("-");

        let save = pick_save_stamp(&tagged)?.ok_or_else(|| {
            EngineError::InvalidRecord(format!("'{}' has no save stamp", file_name))
        })?;
        let span = DateSpan::from_parts(
            decode_date(&tagged, Tag::At)?,
            decode_date(&tagged, Tag::From)?,
            decode_date(&tagged, Tag::To)?,
        )?;

        Ok(FileNameRecord {
            subject,
            menu_code: decode_tag(&tagged, Tag::Menu),
            fund_code: decode_tag(&tagged, Tag::Code),
            span,
            save,
            extension: extension.map(str::to_string),
        })
    }
}

fn split_extension(file_name: &str) -> (&str, Option<&str>) {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() && !ext.contains('-') => (stem, Some(ext)),
        _ => (file_name, None),
    }
}
