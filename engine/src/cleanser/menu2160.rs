// Presets for the menu 2160 export (daily fund price and net assets).
use anyhow::Result;
use shared::models::TimeSeriesTable;

use super::{extract_timeseries, RawSheet};

pub const MENU_CODE: &str = "2160";
pub const DATE_COLUMN: &str = "일자";
pub const PRICE_COLUMN: &str = "수정\n기준가";
pub const ASSET_COLUMN: &str = "순자산총액";

pub fn menu2160_price(sheet: &RawSheet, index_name: &str) -> Result<TimeSeriesTable> {
    extract_timeseries(sheet, DATE_COLUMN, &[(PRICE_COLUMN, "price")], index_name)
}

pub fn menu2160_asset(sheet: &RawSheet, index_name: &str) -> Result<TimeSeriesTable> {
    extract_timeseries(sheet, DATE_COLUMN, &[(ASSET_COLUMN, "asset")], index_name)
}

pub fn menu2160_price_asset(sheet: &RawSheet, index_name: &str) -> Result<TimeSeriesTable> {
    extract_timeseries(
        sheet,
        DATE_COLUMN,
        &[(PRICE_COLUMN, "price"), (ASSET_COLUMN, "asset")],
        index_name,
    )
}
