// Loading and saving date-indexed tables.
// CSV layout: header row, index column first, dates written as YYYY-MM-DD.
// JSON layout: {"index_name", "columns", "index", "data"} so column order survives.
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use shared::dates::{normalize_date, to_dashed};
use shared::models::TimeSeriesTable;

use super::scan::pick_latest_path;
use crate::error::{EngineError, Result};

const BOM: &str = "\u{feff}";
const DEFAULT_INDEX_NAME: &str = "date";

pub fn load_csv(path: &Path) -> Result<TimeSeriesTable> {
    let file = File::open(path)?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(BufReader::new(file));

    let headers = rdr.headers()?.clone();
    let mut header_iter = headers.iter();
    let index_name = header_iter
        .next()
        .map(|h| h.trim_start_matches(BOM).trim().to_string())
        .ok_or_else(|| {
            EngineError::CsvDataFormatError(format!("{} has no header row", path.display()))
        })?;
    let index_name = if index_name.is_empty() {
        DEFAULT_INDEX_NAME.to_string()
    } else {
        index_name
    };
    let columns: Vec<String> = header_iter.map(str::to_string).collect();

    let mut table = TimeSeriesTable::new(index_name, columns);
    for (idx, result) in rdr.records().enumerate() {
        let record = result?;
        let line = idx + 2;
        let raw_date = record.get(0).unwrap_or_default();
        let date = normalize_date(raw_date).map_err(|e| EngineError::DateParseError {
            location: format!("line {} of {}", line, path.display()),
            message: e.to_string(),
        })?;
        let values = record.iter().skip(1).map(str::to_string).collect();
        table.push(date, values).map_err(|e| {
            EngineError::CsvDataFormatError(format!("line {} of {}: {}", line, path.display(), e))
        })?;
    }

    tracing::debug!(path = %path.display(), rows = table.len(), "Loaded CSV table");
    Ok(table)
}

/// Writes `table` with its index as the first column. With `bom`, the file
/// starts with a UTF-8 byte order mark so spreadsheet tools pick the encoding.
pub fn save_csv(table: &TimeSeriesTable, path: &Path, bom: bool) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    if bom {
        file.write_all(BOM.as_bytes())?;
    }

    let mut wtr = WriterBuilder::new().from_writer(file);
    let mut header = Vec::with_capacity(table.columns.len() + 1);
    header.push(table.index_name.as_str());
    header.extend(table.columns.iter().map(String::as_str));
    wtr.write_record(&header)?;

    for row in &table.rows {
        let mut record = Vec::with_capacity(row.values.len() + 1);
        record.push(to_dashed(row.date));
        record.extend(row.values.iter().cloned());
        wtr.write_record(&record)?;
    }
    wtr.flush()?;

    tracing::info!(path = %path.display(), rows = table.len(), "Saved CSV table");
    Ok(())
}

#[derive(Debug, Serialize, Deserialize)]
struct SplitTable {
    #[serde(default = "default_index_name")]
    index_name: String,
    columns: Vec<String>,
    index: Vec<String>,
    data: Vec<Vec<String>>,
}

fn default_index_name() -> String {
    DEFAULT_INDEX_NAME.to_string()
}

pub fn load_json(path: &Path) -> Result<TimeSeriesTable> {
    let file = File::open(path)?;
    let split: SplitTable = serde_json::from_reader(BufReader::new(file))?;
    if split.index.len() != split.data.len() {
        return Err(EngineError::CsvDataFormatError(format!(
            "{}: {} index entries for {} data rows",
            path.display(),
            split.index.len(),
            split.data.len()
        )));
    }

    let mut table = TimeSeriesTable::new(split.index_name, split.columns);
    for (pos, (raw_date, values)) in split.index.iter().zip(split.data).enumerate() {
        let date = normalize_date(raw_date).map_err(|e| EngineError::DateParseError {
            location: format!("index entry {} of {}", pos, path.display()),
            message: e.to_string(),
        })?;
        table.push(date, values)?;
    }
    Ok(table)
}

pub fn save_json(table: &TimeSeriesTable, path: &Path) -> Result<()> {
    let split = SplitTable {
        index_name: table.index_name.clone(),
        columns: table.columns.clone(),
        index: table.rows.iter().map(|r| to_dashed(r.date)).collect(),
        data: table.rows.iter().map(|r| r.values.clone()).collect(),
    };
    let file = BufWriter::new(File::create(path)?);
    serde_json::to_writer(file, &split)?;
    tracing::info!(path = %path.display(), rows = table.len(), "Saved JSON table");
    Ok(())
}

/// Free-form JSON documents (lookup maps, settings snapshots) stored next to tables.
pub fn load_json_value(path: &Path) -> Result<serde_json::Value> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

pub fn save_json_value(value: &serde_json::Value, path: &Path) -> Result<()> {
    let file = BufWriter::new(File::create(path)?);
    serde_json::to_writer(file, value)?;
    tracing::info!(path = %path.display(), "Saved JSON document");
    Ok(())
}

pub fn load_latest_csv(folder: &Path, pattern: &str) -> Result<TimeSeriesTable> {
    load_csv(&pick_latest_path(folder, pattern)?)
}

pub fn load_latest_json(folder: &Path, pattern: &str) -> Result<serde_json::Value> {
    load_json_value(&pick_latest_path(folder, pattern)?)
}

/// `load_latest_csv` for callers where "no file yet" is a normal state.
pub fn try_load_latest_csv(folder: &Path, pattern: &str) -> Result<Option<TimeSeriesTable>> {
    match load_latest_csv(folder, pattern) {
        Ok(table) => Ok(Some(table)),
        Err(e) if e.is_not_found() => {
            tracing::warn!(folder = %folder.display(), pattern, "No file to load");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::tempdir;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sample() -> TimeSeriesTable {
        let mut t = TimeSeriesTable::new("date", vec!["price".to_string(), "asset".to_string()]);
        t.push(d(2024, 1, 2), vec!["1012.5".to_string(), "1,234,000".to_string()]).unwrap();
        t.push(d(2024, 1, 3), vec!["1013.1".to_string(), "".to_string()]).unwrap();
        t
    }

    #[test]
    fn test_csv_round_trip_with_bom() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("table.csv");
        save_csv(&sample(), &path, true).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(BOM.as_bytes()));
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("2024-01-02,1012.5,\"1,234,000\""));

        assert_eq!(load_csv(&path).unwrap(), sample());
    }

    #[test]
    fn test_load_csv_accepts_compact_and_timestamped_index() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("raw.csv");
        fs::write(&path, ",price\n20240102,1\n2024-01-03 00:00:00,2\n").unwrap();

        let table = load_csv(&path).unwrap();
        assert_eq!(table.index_name, "date");
        assert_eq!(table.dates(), vec![d(2024, 1, 2), d(2024, 1, 3)]);
    }

    #[test]
    fn test_load_csv_bad_index_reports_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "date,price\n2024-01-02,1\nyesterday,2\n").unwrap();

        let err = load_csv(&path).unwrap_err();
        match err {
            EngineError::DateParseError { location, .. } => assert!(location.starts_with("line 3")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_csv_ragged_row_is_csv_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ragged.csv");
        fs::write(&path, "date,price\n2024-01-02,1,extra\n").unwrap();
        assert!(matches!(load_csv(&path).unwrap_err(), EngineError::CsvSystemError { .. }));
    }

    #[test]
    fn test_json_round_trip_keeps_column_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("table.json");
        save_json(&sample(), &path).unwrap();
        let loaded = load_json(&path).unwrap();
        assert_eq!(loaded.columns, vec!["price", "asset"]);
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_load_latest_and_missing() {
        let dir = tempdir().unwrap();
        let mut older = sample();
        older.rows.truncate(1);
        save_csv(&older, &dir.path().join("dataset-nav-at20240102-save202401021800.csv"), false).unwrap();
        save_csv(&sample(), &dir.path().join("dataset-nav-at20240103-save202401031800.csv"), false).unwrap();

        assert_eq!(load_latest_csv(dir.path(), "dataset-nav").unwrap().len(), 2);
        assert!(load_latest_csv(dir.path(), "dataset-flows").unwrap_err().is_not_found());
        assert!(try_load_latest_csv(dir.path(), "dataset-flows").unwrap().is_none());
    }

    #[test]
    fn test_json_value_helpers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dataset-mapping-save202401010000.json");
        let value = serde_json::json!({ "005930": "삼성전자", "000660": "SK하이닉스" });
        save_json_value(&value, &path).unwrap();
        assert_eq!(load_latest_json(dir.path(), "mapping").unwrap(), value);
    }
}
