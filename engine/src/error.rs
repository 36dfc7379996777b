use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // The "no prior file" case: a scan matched nothing where one file was required.
    #[error("No file matching '{pattern}' in {}", folder.display())]
    NotFound { folder: PathBuf, pattern: String },

    #[error("Invalid file name record: {0}")]
    InvalidRecord(String),

    #[error("Invalid date at {location}: {message}")]
    DateParseError { location: String, message: String },

    #[error("Invalid scan pattern: {source}")]
    PatternError {
        #[from]
        source: regex::Error,
    },

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("JSON error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },

    #[error("CSV data format error: {0}")]
    CsvDataFormatError(String),

    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),
}

impl EngineError {
    pub fn not_found(folder: impl Into<PathBuf>, pattern: impl Into<String>) -> Self {
        EngineError::NotFound {
            folder: folder.into(),
            pattern: pattern.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, EngineError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_folder_and_pattern() {
        let err = EngineError::not_found("data/dataset-menu2160", "code000001");
        assert!(err.is_not_found());
        let msg = err.to_string();
        assert!(msg.contains("code000001"));
        assert!(msg.contains("dataset-menu2160"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: EngineError = io.into();
        assert!(!err.is_not_found());
        assert!(err.to_string().starts_with("I/O error"));
    }
}
