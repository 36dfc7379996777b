// Moving files out of the live folder: single-file archive and pattern transfers.
use std::fs;
use std::path::{Path, PathBuf};

use super::save::ensure_folder;
use crate::data::scan::scan;
use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferMode {
    #[default]
    Copy,
    Move,
}

impl std::str::FromStr for TransferMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "copy" => Ok(TransferMode::Copy),
            "move" => Ok(TransferMode::Move),
            other => Err(EngineError::ConfigError(format!(
                "invalid transfer mode '{}', expected 'copy' or 'move'",
                other
            ))),
        }
    }
}

/// Renames, falling back to copy + delete when the destination is on another device.
fn move_file(from: &Path, to: &Path) -> Result<()> {
    if fs::rename(from, to).is_err() {
        fs::copy(from, to)?;
        fs::remove_file(from)?;
    }
    Ok(())
}

pub fn handle_archive_file(path: &Path, archive_dir: &Path) -> Result<PathBuf> {
    let file_name = path
        .file_name()
        .ok_or_else(|| EngineError::ConfigError(format!("'{}' has no file name", path.display())))?;
    if !path.is_file() {
        return Err(EngineError::IoError {
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("'{}' does not exist", path.display()),
            ),
        });
    }
    ensure_folder(archive_dir)?;
    let target = archive_dir.join(file_name);
    move_file(path, &target)?;
    tracing::info!(from = %path.display(), to = %target.display(), "Archived file");
    Ok(target)
}

pub fn handle_transfer_files(
    from: &Path,
    to: &Path,
    pattern: &str,
    mode: TransferMode,
) -> Result<Vec<PathBuf>> {
    let names = scan(from, pattern)?;
    ensure_folder(to)?;
    let mut transferred = Vec::with_capacity(names.len());
    for name in names {
        let source = from.join(&name);
        let target = to.join(&name);
        match mode {
            TransferMode::Copy => {
                fs::copy(&source, &target)?;
                tracing::info!(from = %source.display(), to = %target.display(), "Copied");
            }
            TransferMode::Move => {
                move_file(&source, &target)?;
                tracing::info!(from = %source.display(), to = %target.display(), "Moved");
            }
        }
        transferred.push(target);
    }
    Ok(transferred)
}
