// Store settings, loaded from a JSON file or taken from defaults.
// Every service receives these explicitly; nothing here is global.
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct StoreSettings {
    /// Folder acting as the pseudo-database.
    pub data_dir: PathBuf,
    /// Where `archive_file` moves superseded files.
    pub archive_dir: PathBuf,
    /// Literal that starts every encoded file name.
    pub file_prefix: String,
    /// Header of the first (index) column in saved tables.
    pub index_name: String,
    /// Write a UTF-8 BOM so spreadsheets detect the encoding.
    pub csv_bom: bool,
    /// Matching files kept by `prune`.
    pub keep: usize,
    /// Entries skipped by `render_tree`.
    pub ignore_dirs: Vec<String>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            data_dir: PathBuf::from("./data"),
            archive_dir: PathBuf::from("./archive"),
            file_prefix: "dataset".to_string(),
            index_name: "date".to_string(),
            csv_bom: true,
            keep: 10,
            ignore_dirs: vec![
                ".git".to_string(),
                "__pycache__".to_string(),
                ".ipynb_checkpoints".to_string(),
            ],
        }
    }
}

impl StoreSettings {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let settings: StoreSettings = serde_json::from_str(&text)?;
        settings.validate()?;
        tracing::debug!(path = %path.display(), "Loaded store settings");
        Ok(settings)
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.file_prefix.is_empty() || self.file_prefix.contains('-') {
            return Err(EngineError::ConfigError(format!(
                "file_prefix must be non-empty and contain no '-', got '{}'",
                self.file_prefix
            )));
        }
        if self.index_name.trim().is_empty() {
            return Err(EngineError::ConfigError("index_name must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{ "data_dir": "/srv/funds", "keep": 3 }}"#).unwrap();

        let settings = StoreSettings::load_from_file(file.path()).unwrap();
        assert_eq!(settings.data_dir, PathBuf::from("/srv/funds"));
        assert_eq!(settings.keep, 3);
        assert_eq!(settings.file_prefix, "dataset");
        assert!(settings.csv_bom);
    }

    #[test]
    fn test_invalid_prefix_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{ "file_prefix": "data-set" }}"#).unwrap();
        let err = StoreSettings::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, EngineError::ConfigError(_)));
    }

    #[test]
    fn test_malformed_json_is_json_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{{ not json").unwrap();
        let err = StoreSettings::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, EngineError::JsonError { .. }));
    }
}
