//! File name codec.
//!
//! Dataset files carry their metadata in the name:
//!
//! ```text
//! dataset-<subject>[-menu<4 digits>][-code<6 chars>][-at<YYYYMMDD> | -from<YYYYMMDD>-to<YYYYMMDD>]-save<YYYYMMDDHHMM>[.ext]
//! ```
//!
//! Every field is a literal tag followed by a fixed number of word characters,
//! so `decode_field` only needs the tag and the width, and a plain string sort
//! of the names is also a chronological sort.

use chrono::NaiveDate;
use regex::Regex;
use shared::dates::normalize_date;
use shared::models::SaveStamp;

use crate::error::{EngineError, Result};

pub mod extract;
pub mod record;
pub mod series;

pub use record::{DateSpan, FileNameCodec, FileNameRecord};
pub use series::SeriesKey;

/// The tagged fields a file name can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Menu,
    Code,
    At,
    From,
    To,
    Save,
}

impl Tag {
    pub const ALL: [Tag; 6] = [Tag::Menu, Tag::Code, Tag::At, Tag::From, Tag::To, Tag::Save];

    pub fn literal(&self) -> &'static str {
        match self {
            Tag::Menu => "menu",
            Tag::Code => "code",
            Tag::At => "at",
            Tag::From => "from",
            Tag::To => "to",
            Tag::Save => "save",
        }
    }

    pub fn width(&self) -> usize {
        match self {
            Tag::Menu => 4,
            Tag::Code => 6,
            Tag::At | Tag::From | Tag::To => 8,
            Tag::Save => SaveStamp::WIDTH,
        }
    }

    /// True when `segment` is exactly this tag plus a full-width value.
    fn matches_segment(&self, segment: &str) -> bool {
        segment
            .strip_prefix(self.literal())
            .map(|value| value.chars().count() == self.width() && value.chars().all(is_word_char))
            .unwrap_or(false)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Returns the `width` word characters that follow the leftmost occurrence of
/// `tag` which is followed by at least that many word characters, or `None`.
pub fn decode_field(file_name: &str, tag: &str, width: usize) -> Option<String> {
    let re = Regex::new(&format!(r"{}(\w{{{}}})", regex::escape(tag), width)).ok()?;
    re.captures(file_name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

pub fn decode_tag(file_name: &str, tag: Tag) -> Option<String> {
    decode_field(file_name, tag.literal(), tag.width())
}

fn decode_date(file_name: &str, tag: Tag) -> Result<Option<NaiveDate>> {
    decode_tag(file_name, tag)
        .map(|raw| {
            normalize_date(&raw).map_err(|e| EngineError::DateParseError {
                location: format!("'{}' field of {}", tag.literal(), file_name),
                message: e.to_string(),
            })
        })
        .transpose()
}

pub fn pick_menu_code(file_name: &str) -> Option<String> {
    decode_tag(file_name, Tag::Menu)
}

pub fn pick_fund_code(file_name: &str) -> Option<String> {
    decode_tag(file_name, Tag::Code)
}

/// `Ok(None)` when the name has no `at` field, an error when it has one that is not a date.
pub fn pick_ref_date(file_name: &str) -> Result<Option<NaiveDate>> {
    decode_date(file_name, Tag::At)
}

pub fn pick_start_date(file_name: &str) -> Result<Option<NaiveDate>> {
    decode_date(file_name, Tag::From)
}

pub fn pick_end_date(file_name: &str) -> Result<Option<NaiveDate>> {
    decode_date(file_name, Tag::To)
}

pub fn pick_save_stamp(file_name: &str) -> Result<Option<SaveStamp>> {
    decode_tag(file_name, Tag::Save)
        .map(|raw| SaveStamp::parse_compact(&raw).map_err(EngineError::from))
        .transpose()
}
