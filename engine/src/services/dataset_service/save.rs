// Writing tables under encoded file names.
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use shared::models::{SaveStamp, TimeSeriesTable};

use crate::codec::{DateSpan, FileNameCodec, FileNameRecord, SeriesKey};
use crate::config::StoreSettings;
use crate::data::table_io::save_csv;
use crate::error::{EngineError, Result};

const CSV_EXTENSION: &str = "csv";

pub fn ensure_folder(folder: &Path) -> Result<()> {
    if !folder.exists() {
        fs::create_dir_all(folder)?;
        tracing::info!(folder = %folder.display(), "Created folder");
    }
    Ok(())
}

pub fn record_for(key: &SeriesKey, span: DateSpan, stamp: SaveStamp) -> FileNameRecord {
    let mut record = FileNameRecord::new(key.subject.clone(), stamp)
        .with_span(span)
        .with_extension(CSV_EXTENSION);
    record.menu_code = key.menu_code.clone();
    record.fund_code = key.fund_code.clone();
    record
}

/// Span of a table's rows, taken positionally from its first and last index.
pub fn table_span(table: &TimeSeriesTable) -> Result<DateSpan> {
    match (table.first_date(), table.last_date()) {
        (Some(start), Some(end)) => Ok(DateSpan::Range { start, end }),
        _ => Err(EngineError::InvalidRecord(
            "an empty table has no date range to put in a file name".to_string(),
        )),
    }
}

pub fn handle_save(
    settings: &StoreSettings,
    codec: &FileNameCodec,
    table: &TimeSeriesTable,
    record: &FileNameRecord,
) -> Result<PathBuf> {
    let file_name = codec.encode(record)?;
    ensure_folder(&settings.data_dir)?;
    let path = settings.data_dir.join(file_name);
    save_csv(&with_index_name(table, &settings.index_name), &path, settings.csv_bom)?;
    Ok(path)
}

pub fn handle_save_at(
    settings: &StoreSettings,
    codec: &FileNameCodec,
    table: &TimeSeriesTable,
    key: &SeriesKey,
    date: NaiveDate,
    stamp: SaveStamp,
) -> Result<PathBuf> {
    handle_save(settings, codec, table, &record_for(key, DateSpan::At(date), stamp))
}

pub fn handle_save_range(
    settings: &StoreSettings,
    codec: &FileNameCodec,
    table: &TimeSeriesTable,
    key: &SeriesKey,
    stamp: SaveStamp,
) -> Result<PathBuf> {
    let span = table_span(table)?;
    handle_save(settings, codec, table, &record_for(key, span, stamp))
}

fn with_index_name<'a>(table: &'a TimeSeriesTable, index_name: &str) -> Cow<'a, TimeSeriesTable> {
    if table.index_name == index_name {
        Cow::Borrowed(table)
    } else {
        let mut relabeled = table.clone();
        relabeled.index_name = index_name.to_string();
        Cow::Owned(relabeled)
    }
}
