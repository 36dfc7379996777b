// Retention: keep the newest N matches of a pattern, delete the rest.
use std::fs;
use std::path::{Path, PathBuf};

use crate::data::scan::scan_paths;
use crate::error::Result;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct PruneReport {
    pub kept: usize,
    pub deleted: Vec<PathBuf>,
    /// Paths that could not be removed, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

/// The paths `prune` would delete: everything but the last `keep` in sorted order.
pub fn files_to_delete(mut paths: Vec<PathBuf>, keep: usize) -> Vec<PathBuf> {
    if paths.len() <= keep {
        return Vec::new();
    }
    paths.sort();
    paths.truncate(paths.len() - keep);
    paths
}

pub fn handle_prune(folder: &Path, pattern: &str, keep: usize) -> Result<PruneReport> {
    let paths = scan_paths(folder, pattern)?;
    let total = paths.len();
    let doomed = files_to_delete(paths, keep);
    if doomed.is_empty() {
        tracing::info!(folder = %folder.display(), pattern, total, "No files to delete");
        return Ok(PruneReport { kept: total, ..Default::default() });
    }

    tracing::info!(count = doomed.len(), keep, "Deleting old files");
    let mut report = PruneReport {
        kept: total - doomed.len(),
        ..Default::default()
    };
    for path in doomed {
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Deleted");
                report.deleted.push(path);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Deletion failed");
                report.failed.push((path, e.to_string()));
            }
        }
    }
    Ok(report)
}
