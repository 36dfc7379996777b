use anyhow::{anyhow, Result};
use shared::dates::normalize_date;
use shared::models::TimeSeriesTable;
use shared::utils::parse_commaed_number;

use super::RawSheet;

/// Builds a date-indexed table from a raw sheet.
///
/// `value_columns` pairs each source column with its new name. Rows with a
/// blank date or any blank or non-numeric value are dropped; the remaining
/// values are stored without grouping commas. A date that is present but
/// unreadable is an error.
pub fn extract_timeseries(
    sheet: &RawSheet,
    date_column: &str,
    value_columns: &[(&str, &str)],
    index_name: &str,
) -> Result<TimeSeriesTable> {
    let date_pos = sheet.require_column(date_column)?;
    let value_pos = value_columns
        .iter()
        .map(|(from, _)| sheet.require_column(from))
        .collect::<Result<Vec<_>>>()?;

    let columns = value_columns.iter().map(|(_, to)| to.to_string()).collect();
    let mut table = TimeSeriesTable::new(index_name, columns);
    let mut dropped = 0usize;

    for (idx, row) in sheet.rows.iter().enumerate() {
        let raw_date = row.get(date_pos).map(|s| s.trim()).unwrap_or("");
        let values: Option<Vec<String>> = value_pos
            .iter()
            .map(|&pos| {
                row.get(pos)
                    .and_then(|cell| parse_commaed_number(cell))
                    .map(|v| v.to_string())
            })
            .collect();
        let Some(values) = values.filter(|_| !raw_date.is_empty()) else {
            dropped += 1;
            continue;
        };
        let date = normalize_date(raw_date)
            .map_err(|e| anyhow!("Error parsing '{}' at row {}: {}", date_column, idx + 1, e))?;
        table.push(date, values)?;
    }

    if dropped > 0 {
        tracing::debug!(dropped, kept = table.len(), "Dropped incomplete rows");
    }
    Ok(table)
}
