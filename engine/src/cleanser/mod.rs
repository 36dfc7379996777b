// Preprocessing for spreadsheet exports of the office reporting system.
// Exports arrive as CSV with text cells: two-row headers, comma-grouped
// numbers, blank padding rows. Everything here works on plain strings.
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{anyhow, Result};
use csv::ReaderBuilder;

pub mod menu2160;
pub mod multi_header;
pub mod timeseries;

pub use multi_header::{flatten_multi_header, header_categories};
pub use timeseries::extract_timeseries;

const BOM: &str = "\u{feff}";

/// A sheet as exported: header cells plus rows of raw text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawSheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawSheet {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        RawSheet { headers, rows }
    }

    /// Reads a CSV export. Short rows are padded with empty cells.
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| anyhow!("Failed to open export '{}': {}", path.display(), e))?;
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(BufReader::new(file));

        let headers: Vec<String> = rdr
            .headers()?
            .iter()
            .enumerate()
            .map(|(i, h)| if i == 0 { h.trim_start_matches(BOM).to_string() } else { h.to_string() })
            .collect();

        let mut rows = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| anyhow!("Error reading export record at line {}: {}", idx + 2, e))?;
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(headers.len().max(row.len()), String::new());
            rows.push(row);
        }
        tracing::debug!(path = %path.display(), columns = headers.len(), rows = rows.len(), "Read export sheet");
        Ok(RawSheet { headers, rows })
    }

    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_position(name)
            .ok_or_else(|| anyhow!("Missing '{}' column; sheet has {:?}", name, self.headers))
    }

    /// Cell text under `name` in `row`, empty when the row is short.
    pub fn get_field<'a>(&self, row: &'a [String], name: &str) -> Option<&'a str> {
        let pos = self.column_position(name)?;
        Some(row.get(pos).map(String::as_str).unwrap_or(""))
    }
}

/// Groups rows by the text in `column`, keeping the header and row order.
pub fn split_by_column(sheet: &RawSheet, column: &str) -> Result<BTreeMap<String, RawSheet>> {
    let pos = sheet.require_column(column)?;
    let mut groups: BTreeMap<String, RawSheet> = BTreeMap::new();
    for row in &sheet.rows {
        let key = row.get(pos).cloned().unwrap_or_default();
        groups
            .entry(key)
            .or_insert_with(|| RawSheet::new(sheet.headers.clone(), Vec::new()))
            .rows
            .push(row.clone());
    }
    Ok(groups)
}
