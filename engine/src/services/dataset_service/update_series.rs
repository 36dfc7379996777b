// scan -> load the two latest snapshots -> reconcile -> save under a fresh stamp.
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use shared::models::SaveStamp;

use super::save::handle_save_range;
use crate::codec::{pick_end_date, pick_save_stamp, FileNameCodec, SeriesKey};
use crate::config::StoreSettings;
use crate::data::reconcile::{reconcile_detailed, ReconcileOutcome};
use crate::data::scan::{fund_codes_in_folder, scan_paths};
use crate::data::table_io::load_csv;
use crate::error::{EngineError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateReport {
    pub old_path: PathBuf,
    pub new_path: PathBuf,
    pub saved_path: PathBuf,
    pub outcome: ReconcileOutcome,
    pub rows: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesUpdate {
    pub fund_code: String,
    /// `None` when the series had fewer than two snapshots.
    pub report: Option<UpdateReport>,
}

/// Range snapshots of one series ordered by (end date, save stamp). A merged
/// file keeps the oldest start date, so name order would rank it before
/// every later download.
pub fn snapshots_by_recency(folder: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Ok(Vec::new());
    }
    let mut keyed: Vec<((NaiveDate, SaveStamp), PathBuf)> = Vec::new();
    for path in scan_paths(folder, pattern)? {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        let end = pick_end_date(name)?;
        let save = pick_save_stamp(name)?;
        let (Some(end), Some(save)) = (end, save) else {
            return Err(EngineError::InvalidRecord(format!(
                "'{}' has no end date or save stamp",
                path.display()
            )));
        };
        keyed.push(((end, save), path));
    }
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(keyed.into_iter().map(|(_, path)| path).collect())
}

pub fn handle_update_series(
    settings: &StoreSettings,
    codec: &FileNameCodec,
    key: &SeriesKey,
    stamp: SaveStamp,
) -> Result<Option<UpdateReport>> {
    let pattern = key.range_pattern(codec);
    let mut paths = snapshots_by_recency(&settings.data_dir, &pattern)?;
    if paths.len() < 2 {
        tracing::warn!(
            subject = %key.subject,
            fund_code = ?key.fund_code,
            found = paths.len(),
            "There is no old dataset to update"
        );
        return Ok(None);
    }

    let new_path = paths.swap_remove(paths.len() - 1);
    let old_path = paths.swap_remove(paths.len() - 1);
    tracing::info!(old = %old_path.display(), new = %new_path.display(), "Comparing two datasets");

    let old = load_csv(&old_path)?;
    let new = load_csv(&new_path)?;
    let merged = reconcile_detailed(&old, &new);
    let saved_path = handle_save_range(settings, codec, &merged.table, key, stamp)?;
    tracing::info!(path = %saved_path.display(), outcome = ?merged.outcome, "Updated dataset saved");

    Ok(Some(UpdateReport {
        old_path,
        new_path,
        saved_path,
        outcome: merged.outcome,
        rows: merged.table.len(),
    }))
}

/// Runs the update for every fund code found under `base` (its own fund code is ignored).
pub fn handle_update_all_series(
    settings: &StoreSettings,
    codec: &FileNameCodec,
    base: &SeriesKey,
    stamp: SaveStamp,
) -> Result<Vec<SeriesUpdate>> {
    let mut base = base.clone();
    base.fund_code = None;
    if !settings.data_dir.is_dir() {
        tracing::warn!(folder = %settings.data_dir.display(), "Data folder does not exist yet");
        return Ok(Vec::new());
    }
    let codes = fund_codes_in_folder(&settings.data_dir, &base.coded_pattern(codec))?;
    tracing::info!(subject = %base.subject, count = codes.len(), "Updating all series");

    let mut updates = Vec::with_capacity(codes.len());
    for code in codes {
        let key = base.clone().with_fund_code(code.clone());
        let report = handle_update_series(settings, codec, &key, stamp)?;
        updates.push(SeriesUpdate { fund_code: code, report });
    }
    Ok(updates)
}
