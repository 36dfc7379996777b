// Directory scanning: the pseudo-database "query" layer.
// A folder is listed once, entry names are regex-searched, and the result is
// sorted as plain strings. Zero-padded fields make that order chronological.
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use regex::Regex;

use crate::codec::{pick_fund_code, pick_ref_date};
use crate::error::{EngineError, Result};

/// Names of the entries in `folder` whose name contains a match for `pattern`,
/// sorted ascending. Not recursive.
pub fn scan(folder: &Path, pattern: &str) -> Result<Vec<String>> {
    let re = Regex::new(pattern)?;
    let mut names = Vec::new();
    for entry in fs::read_dir(folder)? {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            tracing::debug!(entry = ?file_name, "Skipping non UTF-8 entry name");
            continue;
        };
        if re.is_match(name) {
            names.push(name.to_string());
        }
    }
    names.sort();
    tracing::debug!(folder = %folder.display(), pattern, count = names.len(), "Scanned folder");
    Ok(names)
}

/// Same as `scan`, joined onto `folder`.
pub fn scan_paths(folder: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    Ok(scan(folder, pattern)?.into_iter().map(|name| folder.join(name)).collect())
}

/// Last match of `scan`. Fails with `NotFound` when nothing matches.
pub fn pick_latest(folder: &Path, pattern: &str) -> Result<String> {
    pick_at(folder, pattern, -1)
}

pub fn pick_latest_path(folder: &Path, pattern: &str) -> Result<PathBuf> {
    Ok(folder.join(pick_latest(folder, pattern)?))
}

/// Match at `index`; negative indexes count from the end (-1 is the latest).
pub fn pick_at(folder: &Path, pattern: &str, index: isize) -> Result<String> {
    let mut names = scan(folder, pattern)?;
    let len = names.len() as isize;
    let pos = if index < 0 { len + index } else { index };
    if pos < 0 || pos >= len {
        return Err(EngineError::not_found(folder, pattern));
    }
    Ok(names.swap_remove(pos as usize))
}

/// Reference (`at`) dates of the matching files, in scan order. Names without
/// an `at` field are skipped.
pub fn dates_in_folder(folder: &Path, pattern: &str) -> Result<Vec<NaiveDate>> {
    let mut dates = Vec::new();
    for name in scan(folder, pattern)? {
        if let Some(date) = pick_ref_date(&name)? {
            dates.push(date);
        }
    }
    Ok(dates)
}

pub fn latest_date_in_folder(folder: &Path, pattern: &str) -> Result<NaiveDate> {
    dates_in_folder(folder, pattern)?
        .pop()
        .ok_or_else(|| EngineError::not_found(folder, pattern))
}

/// Distinct fund codes carried by the matching files, sorted.
pub fn fund_codes_in_folder(folder: &Path, pattern: &str) -> Result<Vec<String>> {
    let codes: BTreeSet<String> = scan(folder, pattern)?
        .iter()
        .filter_map(|name| pick_fund_code(name))
        .collect();
    Ok(codes.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    fn touch(dir: &Path, names: &[&str]) {
        for name in names {
            File::create(dir.join(name)).unwrap();
        }
    }

    #[test]
    fn test_scan_filters_and_sorts() {
        let dir = tempdir().unwrap();
        touch(dir.path(), &[
            "dataset-nav-code000002-at20240103-save202401031800.csv",
            "dataset-nav-code000001-at20240102-save202401021800.csv",
            "dataset-nav-code000001-at20240101-save202401011800.csv",
            "notes.txt",
        ]);

        let names = scan(dir.path(), "code000001").unwrap();
        assert_eq!(names, vec![
            "dataset-nav-code000001-at20240101-save202401011800.csv",
            "dataset-nav-code000001-at20240102-save202401021800.csv",
        ]);

        let all = scan(dir.path(), r"^dataset-").unwrap();
        assert_eq!(all.len(), 3);
        let mut sorted = all.clone();
        sorted.sort();
        assert_eq!(all, sorted);
    }

    #[test]
    fn test_scan_paths_are_joined() {
        let dir = tempdir().unwrap();
        touch(dir.path(), &["dataset-a-save202401010000.csv"]);
        let paths = scan_paths(dir.path(), "dataset-a").unwrap();
        assert_eq!(paths, vec![dir.path().join("dataset-a-save202401010000.csv")]);
    }

    #[test]
    fn test_scan_invalid_pattern() {
        let dir = tempdir().unwrap();
        assert!(matches!(scan(dir.path(), "code(").unwrap_err(), EngineError::PatternError { .. }));
    }

    #[test]
    fn test_pick_latest_and_not_found() {
        let dir = tempdir().unwrap();
        touch(dir.path(), &[
            "dataset-nav-at20240101-save202401011800.csv",
            "dataset-nav-at20240102-save202401021800.csv",
        ]);
        assert_eq!(
            pick_latest(dir.path(), "dataset-nav").unwrap(),
            "dataset-nav-at20240102-save202401021800.csv"
        );
        assert_eq!(
            pick_at(dir.path(), "dataset-nav", -2).unwrap(),
            "dataset-nav-at20240101-save202401011800.csv"
        );
        assert!(pick_at(dir.path(), "dataset-nav", 2).unwrap_err().is_not_found());
        assert!(pick_latest(dir.path(), "dataset-flows").unwrap_err().is_not_found());
    }

    #[test]
    fn test_dates_and_codes_in_folder() {
        let dir = tempdir().unwrap();
        touch(dir.path(), &[
            "dataset-nav-code000002-at20240103-save202401031800.csv",
            "dataset-nav-code000001-at20240102-save202401021800.csv",
            "dataset-nav-code000001-at20240101-save202401011800.csv",
            "dataset-nav-code000001-save202401011800.csv",
        ]);

        let dates = dates_in_folder(dir.path(), "code000001").unwrap();
        assert_eq!(dates, vec![
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        ]);
        assert_eq!(
            latest_date_in_folder(dir.path(), "dataset-nav").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()
        );
        assert_eq!(fund_codes_in_folder(dir.path(), "dataset-nav").unwrap(), vec!["000001", "000002"]);
    }
}
