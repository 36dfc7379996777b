// Engine library root
// Pseudo-database toolkit: file name codec, folder scans, table I/O,
// time-series reconciliation and the dataset service built on them.

pub mod cleanser;
pub mod codec;
pub mod config;
pub mod data;
pub mod error;
pub mod services;

pub use codec::{FileNameCodec, FileNameRecord, SeriesKey};
pub use config::StoreSettings;
pub use data::reconcile::reconcile;
pub use error::{EngineError, Result};
pub use services::DatasetService;
