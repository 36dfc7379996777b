// engine/src/services/dataset_service/mod.rs
// DatasetService ties the file name codec, the folder scans and the reconciler
// to one StoreSettings value. Handlers live in the sibling modules.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use shared::models::{SaveStamp, TimeSeriesTable};

use crate::codec::{FileNameCodec, SeriesKey};
use crate::config::StoreSettings;
use crate::data::tree::render_tree;
use crate::error::Result;

pub mod archive;
pub mod prune;
pub mod save;
pub mod update_series;

pub use archive::TransferMode;
pub use prune::PruneReport;
pub use update_series::{SeriesUpdate, UpdateReport};

pub struct DatasetService {
    settings: StoreSettings,
    codec: FileNameCodec,
}

impl DatasetService {
    pub fn new(settings: StoreSettings) -> Result<Self> {
        settings.validate()?;
        let codec = FileNameCodec::new(settings.file_prefix.clone());
        Ok(DatasetService { settings, codec })
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    pub fn codec(&self) -> &FileNameCodec {
        &self.codec
    }

    pub fn data_dir(&self) -> &Path {
        &self.settings.data_dir
    }

    /// Saves `table` as the snapshot of `key` at `date`, stamped now.
    pub fn save_at(&self, table: &TimeSeriesTable, key: &SeriesKey, date: NaiveDate) -> Result<PathBuf> {
        self.save_at_stamp(table, key, date, SaveStamp::now())
    }

    pub fn save_at_stamp(
        &self,
        table: &TimeSeriesTable,
        key: &SeriesKey,
        date: NaiveDate,
        stamp: SaveStamp,
    ) -> Result<PathBuf> {
        save::handle_save_at(&self.settings, &self.codec, table, key, date, stamp)
    }

    /// Saves `table` as a range file spanning its first to last index, stamped now.
    pub fn save_range(&self, table: &TimeSeriesTable, key: &SeriesKey) -> Result<PathBuf> {
        self.save_range_stamp(table, key, SaveStamp::now())
    }

    pub fn save_range_stamp(&self, table: &TimeSeriesTable, key: &SeriesKey, stamp: SaveStamp) -> Result<PathBuf> {
        save::handle_save_range(&self.settings, &self.codec, table, key, stamp)
    }

    /// Reconciles the two latest range snapshots of `key`, ranked by end date then
    /// save stamp, and saves the result. `Ok(None)` when there is nothing to
    /// reconcile yet, including when the data folder does not exist.
    pub fn update_series(&self, key: &SeriesKey) -> Result<Option<UpdateReport>> {
        self.update_series_at(key, SaveStamp::now())
    }

    pub fn update_series_at(&self, key: &SeriesKey, stamp: SaveStamp) -> Result<Option<UpdateReport>> {
        update_series::handle_update_series(&self.settings, &self.codec, key, stamp)
    }

    pub fn update_all_series(&self, base: &SeriesKey) -> Result<Vec<SeriesUpdate>> {
        self.update_all_series_at(base, SaveStamp::now())
    }

    pub fn update_all_series_at(&self, base: &SeriesKey, stamp: SaveStamp) -> Result<Vec<SeriesUpdate>> {
        update_series::handle_update_all_series(&self.settings, &self.codec, base, stamp)
    }

    /// Deletes all but the newest `settings.keep` files matching `pattern`.
    pub fn prune(&self, pattern: &str) -> Result<PruneReport> {
        self.prune_keep(pattern, self.settings.keep)
    }

    pub fn prune_keep(&self, pattern: &str, keep: usize) -> Result<PruneReport> {
        prune::handle_prune(&self.settings.data_dir, pattern, keep)
    }

    pub fn archive_file(&self, path: &Path) -> Result<PathBuf> {
        archive::handle_archive_file(path, &self.settings.archive_dir)
    }

    /// Copies or moves every file of the data folder matching `pattern` into `to`.
    pub fn transfer_files(&self, pattern: &str, to: &Path, mode: TransferMode) -> Result<Vec<PathBuf>> {
        archive::handle_transfer_files(&self.settings.data_dir, to, pattern, mode)
    }

    pub fn render_tree(&self) -> Result<String> {
        render_tree(&self.settings.data_dir, &self.settings.ignore_dirs)
    }
}
