// Two-row headers: the export's header row holds category names (left blank or
// "Unnamed: N" across merged cells), the first data row holds the field names.
use anyhow::{anyhow, Result};

use super::RawSheet;

const JOINER: &str = ": ";

fn is_placeholder(header: &str) -> bool {
    let trimmed = header.trim();
    trimmed.is_empty() || trimmed.contains("Unnamed")
}

/// Category of each column, forward-filled across placeholder cells.
fn filled_prefixes(headers: &[String]) -> Vec<Option<String>> {
    let mut current: Option<String> = None;
    headers
        .iter()
        .map(|h| {
            if !is_placeholder(h) {
                current = Some(h.trim().to_string());
            }
            current.clone()
        })
        .collect()
}

/// Merges the header row and the first data row into "category: field" names
/// and drops that first row. Columns with neither part are removed.
pub fn flatten_multi_header(sheet: &RawSheet) -> Result<RawSheet> {
    let suffixes = sheet
        .rows
        .first()
        .ok_or_else(|| anyhow!("Sheet has no second header row to flatten"))?;

    let mut keep = Vec::new();
    let mut headers = Vec::new();
    for (pos, prefix) in filled_prefixes(&sheet.headers).into_iter().enumerate() {
        let suffix = suffixes.get(pos).map(|s| s.trim()).unwrap_or("");
        let name = match (prefix, suffix.is_empty()) {
            (Some(prefix), false) => format!("{}{}{}", prefix, JOINER, suffix),
            (Some(prefix), true) => prefix,
            (None, false) => suffix.to_string(),
            (None, true) => continue,
        };
        keep.push(pos);
        headers.push(name);
    }

    let rows = sheet.rows[1..]
        .iter()
        .map(|row| {
            keep.iter()
                .map(|&pos| row.get(pos).cloned().unwrap_or_default())
                .collect()
        })
        .collect();
    Ok(RawSheet::new(headers, rows))
}

/// Distinct categories of a two-row header, in column order.
pub fn header_categories(sheet: &RawSheet) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for prefix in filled_prefixes(&sheet.headers).into_iter().flatten() {
        if !categories.contains(&prefix) {
            categories.push(prefix);
        }
    }
    categories
}
